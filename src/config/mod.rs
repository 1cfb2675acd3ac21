use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::mesh::ExtrudeOptions;

fn default_height() -> f64 {
    1.0
}
fn default_twist() -> f64 {
    0.0
}
fn default_scale() -> f64 {
    1.0
}
fn default_steps() -> u32 {
    1
}
fn default_material_ids() -> Vec<u32> {
    vec![0]
}

/// Settings read from `contour3d.toml`.
///
/// Every field has a default, so an empty file is valid. Command-line flags
/// override these values.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_twist")]
    pub twist: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// External material id for each material slot
    #[serde(default = "default_material_ids")]
    pub material_ids: Vec<u32>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub export: Option<PathBuf>,
    /// Douglas-Peucker tolerance applied to the input contour
    #[serde(default)]
    pub simplify: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            twist: default_twist(),
            scale: default_scale(),
            steps: default_steps(),
            material_ids: default_material_ids(),
            output: None,
            export: None,
            simplify: None,
            verbose: false,
        }
    }
}

impl FileConfig {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read and parse one config file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// First parseable file from the default search paths.
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::from_toml(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse config file");
                    }
                }
            }
        }
        None
    }

    pub fn extrude_options(&self) -> ExtrudeOptions {
        ExtrudeOptions {
            height: self.height,
            twist: self.twist,
            scale: self.scale,
            steps: self.steps,
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("contour3d.toml"));
    paths.push(PathBuf::from(".contour3d.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("contour3d").join("config.toml"));
        paths.push(config_dir.join("contour3d.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".contour3d.toml"));
    }

    paths
}
