//! Structural checks for indexed meshes
//!
//! Reports problems that would make a mesh unusable for export or for the
//! boolean engine:
//! - Index buffers whose length is not a multiple of 3
//! - Indices past the end of the vertex buffer
//! - NaN/Inf coordinates
//! - Degenerate triangles (zero area)
//! - Vertex normals that are not unit length

use super::indexed::IndexedMesh;

/// Result of mesh validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Total number of triangles validated
    pub total: usize,
    /// Index buffer length is not a multiple of 3
    pub ragged_indices: bool,
    /// Number of triangles referencing a missing vertex
    pub out_of_range: usize,
    /// Number of triangles with invalid coordinates (NaN/Inf)
    pub invalid_coords: usize,
    /// Number of degenerate triangles (zero or near-zero area)
    pub degenerate: usize,
    /// Number of vertices whose normal is not unit length
    pub invalid_normal: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// No structural errors. Degenerate triangles and odd normals are
    /// reported but tolerated.
    pub fn is_valid(&self) -> bool {
        !self.ragged_indices && self.out_of_range == 0 && self.invalid_coords == 0
    }

    /// Check if the mesh has any issues at all
    pub fn has_issues(&self) -> bool {
        !self.is_valid() || self.degenerate > 0 || self.invalid_normal > 0
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("Mesh valid: {} triangles, no issues", self.total)
        } else {
            format!(
                "Mesh issues: {} total, {} out of range, {} invalid coords, {} degenerate, {} bad normals",
                self.total, self.out_of_range, self.invalid_coords, self.degenerate, self.invalid_normal
            )
        }
    }
}

/// Minimum area threshold for non-degenerate triangles
pub const MIN_TRIANGLE_AREA: f32 = 1e-10;

/// Validate a mesh and return a detailed report
pub fn validate_mesh(mesh: &IndexedMesh) -> ValidationResult {
    let mut result = ValidationResult {
        total: mesh.triangle_count(),
        ..Default::default()
    };

    if mesh.index_count() % 3 != 0 {
        result.ragged_indices = true;
        result.warnings.push(format!(
            "Index buffer length {} is not a multiple of 3",
            mesh.index_count()
        ));
    }

    let vertex_count = mesh.vertex_count();
    for (i, tri) in mesh.triangles().into_iter().enumerate() {
        if tri.iter().any(|&v| v as usize >= vertex_count) {
            result.out_of_range += 1;
            result
                .warnings
                .push(format!("Triangle {} references a missing vertex", i));
            continue;
        }

        let vertices = tri.map(|v| mesh.position(v as usize));
        if has_invalid_coords(&vertices) {
            result.invalid_coords += 1;
            result
                .warnings
                .push(format!("Triangle {} has NaN/Inf coordinates", i));
            continue;
        }

        if triangle_area(&vertices) < MIN_TRIANGLE_AREA {
            result.degenerate += 1;
        }
    }

    result.invalid_normal = mesh
        .normals
        .chunks_exact(3)
        .filter(|n| !is_normal_valid(&[n[0], n[1], n[2]]))
        .count();

    if result.degenerate > 0 {
        result.warnings.push(format!(
            "{} degenerate triangles detected",
            result.degenerate
        ));
    }
    if result.invalid_normal > 0 {
        result.warnings.push(format!(
            "{} vertices have invalid normals",
            result.invalid_normal
        ));
    }

    result
}

/// Check if a triangle has any invalid (NaN/Inf) coordinates
fn has_invalid_coords(vertices: &[[f32; 3]; 3]) -> bool {
    vertices.iter().flatten().any(|c| !c.is_finite())
}

/// Calculate the area of a triangle from its vertices
fn triangle_area(vertices: &[[f32; 3]; 3]) -> f32 {
    let v0 = vertices[0];
    let v1 = vertices[1];
    let v2 = vertices[2];

    let edge_a = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let edge_b = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    let cx = edge_a[1] * edge_b[2] - edge_a[2] * edge_b[1];
    let cy = edge_a[2] * edge_b[0] - edge_a[0] * edge_b[2];
    let cz = edge_a[0] * edge_b[1] - edge_a[1] * edge_b[0];

    0.5 * (cx * cx + cy * cy + cz * cz).sqrt()
}

/// Check if a normal vector is valid (unit length, not zero/NaN)
fn is_normal_valid(normal: &[f32; 3]) -> bool {
    let len_sq = normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2];
    len_sq.is_finite() && (0.99..=1.01).contains(&len_sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(positions: Vec<f32>, indices: Vec<u32>) -> IndexedMesh {
        IndexedMesh::from_buffers(positions, indices)
    }

    #[test]
    fn test_valid_triangle() {
        let mut m = mesh(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]);
        m.compute_vertex_normals();
        let result = validate_mesh(&m);

        assert!(result.is_valid());
        assert!(!result.has_issues());
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_degenerate_triangle_collinear() {
        let m = mesh(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], vec![0, 1, 2]);
        let result = validate_mesh(&m);

        assert_eq!(result.degenerate, 1);
        assert!(result.is_valid());
        assert!(result.has_issues());
    }

    #[test]
    fn test_out_of_range_index() {
        let m = mesh(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 3]);
        let result = validate_mesh(&m);

        assert_eq!(result.out_of_range, 1);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_invalid_coords_nan() {
        let m = mesh(
            vec![f32::NAN, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        );
        let result = validate_mesh(&m);

        assert_eq!(result.invalid_coords, 1);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_ragged_indices() {
        let m = mesh(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2, 0]);
        let result = validate_mesh(&m);

        assert!(result.ragged_indices);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_zero_normals_reported() {
        let mut m = mesh(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], vec![0, 1, 2]);
        m.compute_vertex_normals();
        let result = validate_mesh(&m);

        assert_eq!(result.invalid_normal, 3);
        assert!(result.summary().contains("3 bad normals"));
    }

    #[test]
    fn test_triangle_area() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let area = triangle_area(&vertices);
        assert!((area - 0.5).abs() < 0.001);
    }
}
