//! Linear extrusion of a planar contour along +Z with optional twist and
//! taper.

use tracing::debug;

use super::builder::MeshBuilder;
use super::indexed::{IndexedMesh, MeshGroup};
use super::triangulation::triangulate_contour;
use crate::error::ExtrudeError;
use crate::geometry::{Point2D, is_clockwise, reverse_contour, validate_contour};

/// Parameters of a linear extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// Distance along +Z, must be positive.
    pub height: f64,
    /// Total rotation about Z in degrees, reached at the top face.
    pub twist: f64,
    /// Uniform XY scale reached at the top face.
    pub scale: f64,
    /// Number of layers the side walls are split into.
    pub steps: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            height: 1.0,
            twist: 0.0,
            scale: 1.0,
            steps: 1,
        }
    }
}

impl ExtrudeOptions {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    pub fn with_twist(mut self, degrees: f64) -> Self {
        self.twist = degrees;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Whether the mesh needs the twist/scale pass.
    pub fn is_deformed(&self) -> bool {
        self.twist != 0.0 || self.scale != 1.0
    }

    pub fn validate(&self) -> Result<(), ExtrudeError> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ExtrudeError::InvalidOptions(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        if !self.twist.is_finite() {
            return Err(ExtrudeError::InvalidOptions(format!(
                "twist must be finite, got {}",
                self.twist
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ExtrudeError::InvalidOptions(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.steps == 0 {
            return Err(ExtrudeError::InvalidOptions(
                "steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Extrude a closed contour into an indexed solid.
///
/// The last point connects back to the first. Vertices are laid out as
/// `steps + 1` rings of `n` points, ring `k` at `z = height * k / steps`, in
/// counter-clockwise order (clockwise input is reversed first). Triangles
/// come in three blocks: bottom cap (facing -Z), top cap (facing +Z), then
/// side walls. The whole index range is tagged as one group on slot 0.
pub fn extrude_contour(
    points: &[Point2D],
    options: &ExtrudeOptions,
) -> Result<IndexedMesh, ExtrudeError> {
    validate_contour(points)?;
    options.validate()?;

    let ring = if is_clockwise(points) {
        reverse_contour(points)
    } else {
        points.to_vec()
    };

    let cap = triangulate_contour(&ring);
    if cap.is_empty() {
        return Err(ExtrudeError::Triangulation);
    }

    let n = ring.len();
    let steps = options.steps as usize;
    let mut builder = MeshBuilder::with_capacity(n * (steps + 1), cap.len() * 2 / 3 + n * steps * 2);

    for layer in 0..=steps {
        let z = (options.height * layer as f64 / steps as f64) as f32;
        for p in &ring {
            builder.add_vertex([p.x as f32, p.y as f32, z]);
        }
    }

    let top = (steps * n) as u32;
    for tri in cap.chunks_exact(3) {
        let (a, b, c) = oriented_ccw(&ring, tri[0], tri[1], tri[2]);
        builder.add_triangle(a, c, b);
    }
    for tri in cap.chunks_exact(3) {
        let (a, b, c) = oriented_ccw(&ring, tri[0], tri[1], tri[2]);
        builder.add_triangle(top + a, top + b, top + c);
    }

    add_side_walls(&mut builder, n, steps);

    let mut mesh = builder.finish();
    mesh.compute_vertex_normals();

    if options.is_deformed() {
        mesh = deformed(&mesh, options.twist, options.scale);
    }

    mesh.groups = vec![MeshGroup::new(0, mesh.index_count(), 0)];

    debug!(
        points = n,
        steps,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        twist = options.twist,
        scale = options.scale,
        "extruded contour"
    );

    Ok(mesh)
}

/// Ring-local indices of a cap triangle, ordered counter-clockwise in XY.
fn oriented_ccw(ring: &[Point2D], a: usize, b: usize, c: usize) -> (u32, u32, u32) {
    let pa = ring[a].to_dvec2();
    let cross = (ring[b].to_dvec2() - pa).perp_dot(ring[c].to_dvec2() - pa);
    if cross >= 0.0 {
        (a as u32, b as u32, c as u32)
    } else {
        (a as u32, c as u32, b as u32)
    }
}

/// Two triangles per contour edge per layer, facing outward for a
/// counter-clockwise ring.
fn add_side_walls(builder: &mut MeshBuilder, n: usize, steps: usize) {
    for layer in 0..steps {
        let lower = layer * n;
        let upper = (layer + 1) * n;
        for i in 0..n {
            let j = (i + 1) % n;
            builder.add_quad(
                (lower + i) as u32,
                (lower + j) as u32,
                (upper + j) as u32,
                (upper + i) as u32,
            );
        }
    }
}

/// Twisted and scaled copy of `mesh`.
///
/// See [`deform_in_place`]; the input is left untouched.
pub fn deformed(mesh: &IndexedMesh, twist: f64, scale: f64) -> IndexedMesh {
    let mut out = mesh.clone();
    deform_in_place(&mut out, twist, scale);
    out
}

/// Rotate and scale every vertex in its XY plane by its height.
///
/// With `t` the vertex's normalized position between the lowest and highest
/// Z of the mesh, the vertex is rotated about Z by `twist * t` degrees and
/// scaled in X/Y by `1 + (scale - 1) * t`; Z is unchanged. The bottom face is
/// left as is, the top face gets the full twist and scale. Vertex normals are
/// recomputed afterwards. A mesh with no Z extent is not modified.
pub fn deform_in_place(mesh: &mut IndexedMesh, twist: f64, scale: f64) {
    let Some(bounds) = mesh.bounds() else {
        return;
    };
    let min_z = bounds.min[2] as f64;
    let range_z = bounds.extent(2) as f64;
    if range_z <= 0.0 {
        return;
    }

    for p in mesh.positions.chunks_exact_mut(3) {
        let (x, y, z) = (p[0] as f64, p[1] as f64, p[2] as f64);

        let t = (z - min_z) / range_z;
        let angle = (twist * t).to_radians();
        let s = 1.0 + (scale - 1.0) * t;
        let (sin, cos) = angle.sin_cos();

        p[0] = ((x * cos - y * sin) * s) as f32;
        p[1] = ((x * sin + y * cos) * s) as f32;
    }

    mesh.compute_vertex_normals();
}
