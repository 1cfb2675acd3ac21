use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

use contour3d::config::FileConfig;
use contour3d::geometry::{
    CLOSURE_EPSILON, Point2D, contour_area, dedupe_contour, is_clockwise, simplify_contour,
};
use contour3d::mesh::{
    VertexWelder, export_and_merge, extrude_contour, stl::estimate_stl_size, validate_mesh,
    write_stl,
};

/// Extrude a 2D contour into a solid and package it for a boolean-mesh engine
///
/// Examples:
///   # Straight 10mm extrusion
///   contour3d outline.json --height 10
///
///   # Twisted, tapered column in 8 layers, plus engine buffers
///   contour3d star.json --height 40 --twist 90 --scale 0.5 --steps 8 --export star.mesh.json
///
///   # Use a config file
///   contour3d outline.json --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "contour3d")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with {"points": [[x, y], ...]}
    input: PathBuf,

    /// Path to config file (optional, auto-searches contour3d.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extrusion height
    #[arg(long)]
    height: Option<f64>,

    /// Total twist in degrees at the top face
    #[arg(long, allow_hyphen_values = true)]
    twist: Option<f64>,

    /// Scale factor at the top face
    #[arg(long)]
    scale: Option<f64>,

    /// Number of layers along the extrusion
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    steps: Option<u32>,

    /// Output STL file path (defaults to {input}.stl)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write the engine buffer set as JSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// External material id per slot (repeat for more slots)
    #[arg(long = "material-id")]
    material_ids: Vec<u32>,

    /// Douglas-Peucker tolerance for the input contour
    #[arg(long)]
    simplify: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct ContourFile {
    points: Vec<[f64; 2]>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let file_config = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {:?}", config_path);
            }
            FileConfig::from_path(config_path)?
        }
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;

    let mut options = file_config.extrude_options();
    if let Some(height) = args.height {
        options.height = height;
    }
    if let Some(twist) = args.twist {
        options.twist = twist;
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if let Some(steps) = args.steps {
        options.steps = steps;
    }
    let material_ids = if args.material_ids.is_empty() {
        file_config.material_ids.clone()
    } else {
        args.material_ids.clone()
    };
    let simplify = args.simplify.or(file_config.simplify);
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| args.input.with_extension("stl"));
    let export_path = args.export.clone().or_else(|| file_config.export.clone());

    println!("contour3d - Contour Extruder");
    println!("============================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Height: {}", options.height);
        println!("  Twist: {} deg", options.twist);
        println!("  Scale: {}", options.scale);
        println!("  Steps: {}", options.steps);
        println!("  Material ids: {:?}", material_ids);
        if let Some(eps) = simplify {
            println!("  Simplify tolerance: {}", eps);
        }
        println!("  Output: {}", output_path.display());
        if let Some(ref path) = export_path {
            println!("  Export: {}", path.display());
        }
        println!();
    }

    let spinner = create_spinner("Reading contour...");
    let start = Instant::now();
    let raw = read_contour(&args.input)?;
    let mut points = dedupe_contour(&raw, CLOSURE_EPSILON);
    if let Some(eps) = simplify {
        points = simplify_contour(&points, eps);
    }
    spinner.finish_with_message(format!(
        "Read {} points ({} after cleanup), area {:.3}, {} [{:.1}s]",
        raw.len(),
        points.len(),
        contour_area(&points),
        if is_clockwise(&points) {
            "clockwise"
        } else {
            "counter-clockwise"
        },
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Extruding...");
    let start = Instant::now();
    let mesh = extrude_contour(&points, &options).context("Failed to extrude contour")?;
    spinner.finish_with_message(format!(
        "Generated {} vertices, {} triangles [{:.1}s]",
        mesh.vertex_count(),
        mesh.triangle_count(),
        start.elapsed().as_secs_f32()
    ));

    let report = validate_mesh(&mesh);
    if verbose || report.has_issues() {
        println!("  {}", report.summary());
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }
    if !report.is_valid() {
        bail!("Generated mesh failed validation");
    }

    let spinner = create_spinner("Writing STL file...");
    let start = Instant::now();
    write_stl(&output_path, &mesh).context("Failed to write STL file")?;
    let file_size = estimate_stl_size(mesh.triangle_count());
    spinner.finish_with_message(format!(
        "Wrote {} triangles ({:.1} KB) [{:.1}s]",
        mesh.triangle_count(),
        file_size as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    if let Some(ref path) = export_path {
        let spinner = create_spinner("Packaging engine buffers...");
        let start = Instant::now();
        let engine_mesh = export_and_merge(&mesh, &material_ids, &mut VertexWelder)
            .context("Failed to package mesh")?;
        let json = serde_json::to_string(&engine_mesh).context("Failed to encode mesh")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        spinner.finish_with_message(format!(
            "Exported {} vertices, {} runs [{:.1}s]",
            engine_mesh.num_vert(),
            engine_mesh.run_count(),
            start.elapsed().as_secs_f32()
        ));
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!("Output: {}", output_path.display());

    Ok(())
}

fn read_contour(path: &Path) -> Result<Vec<Point2D>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read contour file: {}", path.display()))?;
    let file: ContourFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse contour file: {}", path.display()))?;
    Ok(file.points.into_iter().map(Point2D::from).collect())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
