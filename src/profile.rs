//! Extrusion along an arbitrary direction with a start/end scale pair.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, Result};
use crate::geometry::{Contour2D, Point2D};
use crate::mesh::{ExtrudeOptions, IndexedMesh, extrude_contour};

/// Contour scale at the bottom and top face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub start: f64,
    pub end: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 1.0,
        }
    }
}

/// Everything needed to turn a closed contour into a solid.
#[derive(Debug, Clone)]
pub struct ExtrusionProfile {
    pub contour: Contour2D,
    pub height: f64,
    /// Extrusion axis; the contour plane is perpendicular to it.
    pub direction: DVec3,
    /// Degrees of rotation reached at the top face.
    pub twist: Option<f64>,
    pub scale: Option<ScaleRange>,
    pub steps: u32,
}

impl ExtrusionProfile {
    /// Straight extrusion along +Z.
    pub fn new(contour: Contour2D, height: f64) -> Self {
        Self {
            contour,
            height,
            direction: DVec3::Z,
            twist: None,
            scale: None,
            steps: 1,
        }
    }

    pub fn with_direction(mut self, direction: DVec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_twist(mut self, degrees: f64) -> Self {
        self.twist = Some(degrees);
        self
    }

    pub fn with_scale(mut self, start: f64, end: f64) -> Self {
        self.scale = Some(ScaleRange { start, end });
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Build the solid.
    ///
    /// The contour is scaled by `scale.start` about the origin, extruded
    /// along +Z with a taper of `end / start`, then rotated so +Z points
    /// along `direction`.
    pub fn extrude(&self) -> Result<IndexedMesh> {
        if !self.contour.is_closed() {
            return Err(ProfileError::OpenContour.into());
        }
        let axis = self
            .direction
            .try_normalize()
            .ok_or(ProfileError::ZeroDirection)?;
        let range = self.scale.unwrap_or_default();
        if !range.start.is_finite() || range.start <= 0.0 {
            return Err(ProfileError::InvalidScale(range.start).into());
        }

        let points: Vec<Point2D> = self
            .contour
            .points()
            .iter()
            .map(|p| Point2D::new(p.x * range.start, p.y * range.start))
            .collect();

        let options = ExtrudeOptions {
            height: self.height,
            twist: self.twist.unwrap_or(0.0),
            scale: range.end / range.start,
            steps: self.steps,
        };
        let mut mesh = extrude_contour(&points, &options)?;

        if axis != DVec3::Z {
            let rotation = DQuat::from_rotation_arc(DVec3::Z, axis);
            rotate_buffer(&mut mesh.positions, rotation);
            rotate_buffer(&mut mesh.normals, rotation);
            debug!(?axis, "oriented extrusion");
        }

        Ok(mesh)
    }
}

fn rotate_buffer(buffer: &mut [f32], rotation: DQuat) {
    for v in buffer.chunks_exact_mut(3) {
        let r = rotation * DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64);
        v[0] = r.x as f32;
        v[1] = r.y as f32;
        v[2] = r.z as f32;
    }
}
