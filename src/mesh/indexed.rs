//! Indexed triangle meshes: flat position/index/normal buffers plus
//! material groups.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::builder::Triangle;

/// Contiguous index range drawn with one material slot.
///
/// `start` and `count` are measured in indices, not triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGroup {
    pub start: usize,
    pub count: usize,
    pub material_slot: usize,
}

impl MeshGroup {
    pub fn new(start: usize, count: usize, material_slot: usize) -> Self {
        Self {
            start,
            count,
            material_slot,
        }
    }
}

/// Axis-aligned bounding box of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds3 {
    pub fn extent(&self, axis: usize) -> f32 {
        self.max[axis] - self.min[axis]
    }
}

/// Triangle mesh with 3 floats per vertex and, normally, 3 indices per
/// triangle.
///
/// `indices` is `None` for a triangle soup where every three consecutive
/// vertices form a triangle. `normals` is either empty or parallel to
/// `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    pub normals: Vec<f32>,
    pub groups: Vec<MeshGroup>,
}

impl IndexedMesh {
    /// Empty mesh with an (empty) index buffer.
    pub fn new() -> Self {
        Self {
            indices: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn from_buffers(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices: Some(indices),
            ..Default::default()
        }
    }

    pub fn unindexed(positions: Vec<f32>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    /// Unindexed soup from loose triangles.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let positions = triangles
            .iter()
            .flat_map(|tri| tri.vertices.iter().flatten().copied())
            .collect();
        Self::unindexed(positions)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertex_count(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn normal(&self, vertex: usize) -> Option<[f32; 3]> {
        let i = vertex * 3;
        self.normals.get(i..i + 3).map(|n| [n[0], n[1], n[2]])
    }

    /// Give an unindexed soup the identity index buffer (`i -> i`).
    pub fn ensure_indexed(&mut self) {
        if self.indices.is_none() {
            self.indices = Some((0..self.vertex_count() as u32).collect());
        }
    }

    /// Vertex indices of every triangle; identity order for a soup.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.triangle_count() as u32)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        if self.positions.len() < 3 {
            return None;
        }
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some(Bounds3 { min, max })
    }

    pub fn add_group(&mut self, start: usize, count: usize, material_slot: usize) {
        self.groups.push(MeshGroup::new(start, count, material_slot));
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Area-weighted smooth vertex normals.
    ///
    /// Vertices touched only by degenerate triangles end up with a zero
    /// normal. Triangles referencing missing vertices are skipped.
    pub fn compute_vertex_normals(&mut self) {
        let count = self.vertex_count();
        let mut accum = vec![Vec3::ZERO; count];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            if a >= count || b >= count || c >= count {
                continue;
            }
            let pa = Vec3::from_array(self.position(a));
            let pb = Vec3::from_array(self.position(b));
            let pc = Vec3::from_array(self.position(c));
            // Unnormalized cross product weights by twice the triangle area
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        self.normals = accum
            .into_iter()
            .flat_map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}
