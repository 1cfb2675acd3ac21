use geo::{LineString, Simplify};
use tracing::debug;

use super::contour::MIN_CONTOUR_POINTS;
use super::primitives::Point2D;

fn near(a: Point2D, b: Point2D, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// Drop consecutive near-coincident points and a closing point that repeats
/// the first one.
///
/// Uses the same per-axis test as [`super::is_contour_closed`].
pub fn dedupe_contour(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let mut out: Vec<Point2D> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(&prev) if near(prev, p, epsilon) => {}
            _ => out.push(p),
        }
    }

    while out.len() > 1 && near(out[0], out[out.len() - 1], epsilon) {
        out.pop();
    }

    if out.len() != points.len() {
        debug!(
            before = points.len(),
            after = out.len(),
            "dropped duplicate contour points"
        );
    }
    out
}

/// Douglas-Peucker simplification of a closed contour.
///
/// Returns the input unchanged when it is too short to simplify or when
/// fewer than three points would survive.
pub fn simplify_contour(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    // Close the ring so the last edge takes part in the simplification.
    let ring: LineString<f64> = points
        .iter()
        .chain(points.first())
        .map(|p| geo::coord! { x: p.x, y: p.y })
        .collect();

    let simplified = ring.simplify(&epsilon);
    let mut out: Vec<Point2D> = simplified
        .0
        .into_iter()
        .map(|c| Point2D::new(c.x, c.y))
        .collect();
    out.pop();

    if out.len() < MIN_CONTOUR_POINTS {
        return points.to_vec();
    }
    out
}
