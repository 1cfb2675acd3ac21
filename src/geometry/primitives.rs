//! Vertex, edge, face and planar point/line value types.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::ids::{EdgeId, FaceId, IdAllocator, LineId, VertexId};
use crate::error::FaceError;

/// A point on the contour plane. Equality is by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        self.to_dvec2().distance(other.to_dvec2())
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lift onto the plane `z`.
    pub fn to_vertex(self, id: VertexId, z: f64) -> Vertex {
        Vertex::new(id, self.x, self.y, z)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<DVec2> for Point2D {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// A point in 3D space with a handle and caller annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub position: DVec3,
    pub attributes: Attributes,
}

impl Vertex {
    pub fn new(id: VertexId, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            position: DVec3::new(x, y, z),
            attributes: Attributes::default(),
        }
    }

    pub fn distance_to(&self, other: &Vertex) -> f64 {
        self.position.distance(other.position)
    }

    /// Copy with a fresh handle; attributes are carried over.
    pub fn duplicate(&self, id: VertexId) -> Self {
        Self {
            id,
            position: self.position,
            attributes: self.attributes.clone(),
        }
    }
}

/// Ordered pair of vertices.
///
/// Zero-length edges are accepted; [`Edge::direction`] returns `None` for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub start: Vertex,
    pub end: Vertex,
}

impl Edge {
    pub fn new(id: EdgeId, start: Vertex, end: Vertex) -> Self {
        Self { id, start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> DVec3 {
        (self.start.position + self.end.position) * 0.5
    }

    /// Unit vector from start to end.
    pub fn direction(&self) -> Option<DVec3> {
        (self.end.position - self.start.position).try_normalize()
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() == 0.0
    }
}

/// Planar polygon given by at least three vertices.
///
/// Vertex order defines winding and therefore the sign of the normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    vertices: Vec<Vertex>,
}

impl Face {
    pub fn new(id: FaceId, vertices: Vec<Vertex>) -> Result<Self, FaceError> {
        if vertices.len() < 3 {
            return Err(FaceError::TooFewVertices(vertices.len()));
        }
        Ok(Self { id, vertices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Unit normal from the first three vertices. Larger faces are assumed
    /// planar and consistently wound; `None` when those three are collinear.
    pub fn normal(&self) -> Option<DVec3> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;
        (v1 - v0).cross(v2 - v0).try_normalize()
    }

    /// Shoelace area of the XY projection, signed by winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i].position;
                let b = self.vertices[(i + 1) % n].position;
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn centroid(&self) -> DVec3 {
        let sum: DVec3 = self.vertices.iter().map(|v| v.position).sum();
        sum / self.vertices.len() as f64
    }
}

/// Segment between two planar points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2D {
    pub id: LineId,
    pub start: Point2D,
    pub end: Point2D,
}

impl Line2D {
    pub fn new(id: LineId, start: Point2D, end: Point2D) -> Self {
        Self { id, start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn direction(&self) -> Option<DVec2> {
        (self.end.to_dvec2() - self.start.to_dvec2()).try_normalize()
    }

    /// Lift onto the plane `z`, allocating handles for the new entities.
    pub fn to_edge(&self, ids: &mut IdAllocator, z: f64) -> Edge {
        let start = self.start.to_vertex(ids.vertex(), z);
        let end = self.end.to_vertex(ids.vertex(), z);
        Edge::new(ids.edge(), start, end)
    }
}
