use earcutr::earcut;

use crate::geometry::Point2D;

/// Ear-clip a simple contour. Returns indices into `points`, three per
/// triangle, or an empty vector when triangulation fails.
pub fn triangulate_contour(points: &[Point2D]) -> Vec<usize> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices: Vec<f64> = Vec::with_capacity(points.len() * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    earcut(&vertices, &[], 2).unwrap_or_default()
}
