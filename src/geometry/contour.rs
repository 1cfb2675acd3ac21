//! Planar contours and the winding/area utilities used before extrusion.
//!
//! All functions work in a Y-up frame: counter-clockwise means the usual
//! mathematical positive orientation with +X right and +Y up.

use glam::DVec2;

use super::attributes::Attributes;
use super::ids::{ContourId, IdAllocator};
use super::primitives::{Line2D, Point2D};
use crate::error::ContourError;

/// Default tolerance for [`is_contour_closed`].
pub const CLOSURE_EPSILON: f64 = 0.001;

/// Minimum number of points for a contour that encloses area.
pub const MIN_CONTOUR_POINTS: usize = 3;

/// Proximity closure test for raw point lists.
///
/// True when there are at least three points and the first and last point
/// differ by less than `epsilon` on both axes.
pub fn is_contour_closed(points: &[Point2D], epsilon: f64) -> bool {
    if points.len() < MIN_CONTOUR_POINTS {
        return false;
    }
    let first = points[0];
    let last = points[points.len() - 1];
    (first.x - last.x).abs() < epsilon && (first.y - last.y).abs() < epsilon
}

/// Shoelace area with sign: positive for counter-clockwise (Y-up).
pub fn signed_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < MIN_CONTOUR_POINTS {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += points[i].x * points[j].y;
        twice -= points[j].x * points[i].y;
    }
    twice / 2.0
}

/// Enclosed area, independent of winding.
pub fn contour_area(points: &[Point2D]) -> f64 {
    signed_area(points).abs()
}

/// Winding test in a Y-up frame.
///
/// Evaluates `Σ (x[i+1] - x[i]) * (y[i+1] + y[i])`, which equals
/// `-2 * signed_area`. A positive sum is clockwise with +Y pointing up. The
/// same points drawn in a Y-down (screen) frame appear counter-clockwise, so
/// producers working in screen space must flip Y or invert the result.
pub fn is_clockwise(points: &[Point2D]) -> bool {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += (points[j].x - points[i].x) * (points[j].y + points[i].y);
    }
    sum > 0.0
}

/// New sequence with the point order reversed.
pub fn reverse_contour(points: &[Point2D]) -> Vec<Point2D> {
    points.iter().rev().copied().collect()
}

/// Vertex average; the origin for an empty slice.
pub fn contour_centroid(points: &[Point2D]) -> Point2D {
    if points.is_empty() {
        return Point2D::default();
    }
    let sum: DVec2 = points.iter().map(|p| p.to_dvec2()).sum();
    Point2D::from(sum / points.len() as f64)
}

/// Checks that `points` can be extruded: enough points, finite coordinates,
/// no zero-length edge (wrapping last to first), non-zero area.
pub fn validate_contour(points: &[Point2D]) -> Result<(), ContourError> {
    if points.len() < MIN_CONTOUR_POINTS {
        return Err(ContourError::TooFewPoints {
            min: MIN_CONTOUR_POINTS,
            actual: points.len(),
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(ContourError::NonFinite { index });
    }
    let n = points.len();
    for index in 0..n {
        let a = points[index].to_dvec2();
        let b = points[(index + 1) % n].to_dvec2();
        if (b - a).try_normalize().is_none() {
            return Err(ContourError::DegenerateEdge { index });
        }
    }
    if signed_area(points) == 0.0 {
        return Err(ContourError::ZeroArea);
    }
    Ok(())
}

/// An ordered point sequence with an explicit closed flag.
///
/// Once closed the contour no longer accepts points.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour2D {
    pub id: ContourId,
    points: Vec<Point2D>,
    closed: bool,
    pub attributes: Attributes,
}

impl Contour2D {
    pub fn new(id: ContourId) -> Self {
        Self::from_points(id, Vec::new())
    }

    pub fn from_points(id: ContourId, points: Vec<Point2D>) -> Self {
        Self {
            id,
            points,
            closed: false,
            attributes: Attributes::default(),
        }
    }

    /// Appends a point; returns `false` and ignores it once closed.
    pub fn push(&mut self, point: Point2D) -> bool {
        if self.closed {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Marks the contour closed. Requires at least three points.
    pub fn close(&mut self) -> Result<(), ContourError> {
        if self.points.len() < MIN_CONTOUR_POINTS {
            return Err(ContourError::TooFewPoints {
                min: MIN_CONTOUR_POINTS,
                actual: self.points.len(),
            });
        }
        self.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments between consecutive points, plus last to first when closed.
    pub fn lines(&self, ids: &mut IdAllocator) -> Vec<Line2D> {
        let mut lines: Vec<Line2D> = self
            .points
            .windows(2)
            .map(|pair| Line2D::new(ids.line(), pair[0], pair[1]))
            .collect();
        if self.closed
            && let (Some(&first), Some(&last)) = (self.points.first(), self.points.last())
        {
            lines.push(Line2D::new(ids.line(), last, first));
        }
        lines
    }

    pub fn perimeter(&self) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + last.distance_to(first),
            _ => open,
        }
    }

    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    pub fn centroid(&self) -> Point2D {
        contour_centroid(&self.points)
    }

    pub fn is_clockwise(&self) -> bool {
        is_clockwise(&self.points)
    }

    /// Same contour with reversed winding; keeps the id and closed flag.
    pub fn reversed(&self) -> Self {
        Self {
            id: self.id,
            points: reverse_contour(&self.points),
            closed: self.closed,
            attributes: self.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point2D> {
        raw.iter().map(|&p| Point2D::from(p)).collect()
    }

    fn square() -> Vec<Point2D> {
        pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn regular_polygon(n: usize, radius: f64) -> Vec<Point2D> {
        (0..n)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / n as f64;
                Point2D::new(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_square_area() {
        assert!((contour_area(&square()) - 100.0).abs() < 1e-9);
        assert!(signed_area(&square()) > 0.0);
    }

    #[test]
    fn test_area_survives_reverse_and_translation() {
        let shape = pts(&[(0.0, 0.0), (4.0, 1.0), (5.0, 4.0), (1.0, 6.0), (-2.0, 3.0)]);
        let base = contour_area(&shape);

        assert!((contour_area(&reverse_contour(&shape)) - base).abs() < 1e-9);

        let moved: Vec<Point2D> = shape
            .iter()
            .map(|p| Point2D::new(p.x + 123.5, p.y - 42.25))
            .collect();
        assert!((contour_area(&moved) - base).abs() < 1e-9);
    }

    #[test]
    fn test_regular_polygon_area() {
        for n in [3usize, 5, 8, 32] {
            let r = 2.5;
            let expected = 0.5 * n as f64 * r * r * (2.0 * PI / n as f64).sin();
            let area = contour_area(&regular_polygon(n, r));
            assert!((area - expected).abs() < 1e-9, "n = {n}");
        }
    }

    #[test]
    fn test_winding_y_up() {
        // Counter-clockwise with +Y up
        assert!(!is_clockwise(&square()));
        assert!(is_clockwise(&reverse_contour(&square())));
    }

    #[test]
    fn test_reverse_flips_winding() {
        let shapes = [
            square(),
            regular_polygon(7, 3.0),
            pts(&[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (2.0, 2.0), (2.0, 6.0), (0.0, 6.0)]),
        ];
        for shape in &shapes {
            assert_ne!(is_clockwise(shape), is_clockwise(&reverse_contour(shape)));
        }
    }

    #[test]
    fn test_reverse_leaves_input_alone() {
        let original = square();
        let reversed = reverse_contour(&original);
        assert_eq!(original, square());
        assert_eq!(reversed[0], original[3]);
        assert_eq!(reversed[3], original[0]);
    }

    #[test]
    fn test_closed_by_proximity() {
        let mut shape = square();
        shape.push(shape[0]);
        assert!(is_contour_closed(&shape, CLOSURE_EPSILON));

        let last = shape.len() - 1;
        shape[last].x += CLOSURE_EPSILON;
        assert!(!is_contour_closed(&shape, CLOSURE_EPSILON));
    }

    #[test]
    fn test_closed_needs_three_points() {
        let two = pts(&[(0.0, 0.0), (0.0, 0.0)]);
        assert!(!is_contour_closed(&two, CLOSURE_EPSILON));
    }

    #[test]
    fn test_centroid() {
        assert_eq!(contour_centroid(&square()), Point2D::new(5.0, 5.0));
        assert_eq!(contour_centroid(&[]), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_validate_contour() {
        assert!(validate_contour(&square()).is_ok());
        assert_eq!(
            validate_contour(&square()[..2]),
            Err(ContourError::TooFewPoints { min: 3, actual: 2 })
        );

        let mut repeated = square();
        repeated.push(repeated[0]);
        assert_eq!(
            validate_contour(&repeated),
            Err(ContourError::DegenerateEdge { index: 4 })
        );

        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(validate_contour(&line), Err(ContourError::ZeroArea));

        let nan = pts(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
        assert_eq!(validate_contour(&nan), Err(ContourError::NonFinite { index: 1 }));
    }

    #[test]
    fn test_contour_close_and_append() {
        let mut ids = IdAllocator::new();
        let mut contour = Contour2D::new(ids.contour());
        assert!(contour.push(Point2D::new(0.0, 0.0)));
        assert!(contour.push(Point2D::new(1.0, 0.0)));
        assert!(contour.close().is_err());
        assert!(!contour.is_closed());

        assert!(contour.push(Point2D::new(0.0, 1.0)));
        contour.close().unwrap();
        assert!(contour.is_closed());

        assert!(!contour.push(Point2D::new(5.0, 5.0)));
        assert_eq!(contour.len(), 3);
    }

    #[test]
    fn test_contour_lines_wrap_only_when_closed() {
        let mut ids = IdAllocator::new();
        let mut contour = Contour2D::from_points(ids.contour(), square());
        assert_eq!(contour.lines(&mut ids).len(), 3);
        assert!((contour.perimeter() - 30.0).abs() < 1e-9);

        contour.close().unwrap();
        let lines = contour.lines(&mut ids);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].start, Point2D::new(0.0, 10.0));
        assert_eq!(lines[3].end, Point2D::new(0.0, 0.0));
        assert!((contour.perimeter() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_contour_reversed_keeps_identity() {
        let mut ids = IdAllocator::new();
        let mut contour = Contour2D::from_points(ids.contour(), square());
        contour.close().unwrap();
        let reversed = contour.reversed();

        assert_eq!(reversed.id, contour.id);
        assert!(reversed.is_closed());
        assert!(reversed.is_clockwise());
        assert!((reversed.area() - contour.area()).abs() < 1e-12);
    }
}
