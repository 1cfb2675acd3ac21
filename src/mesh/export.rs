//! Packaging of indexed meshes into the run-indexed buffer set consumed by
//! boolean-mesh engines.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::indexed::{IndexedMesh, MeshGroup};
use crate::error::ExportError;

/// Floats per vertex in [`EngineMesh::vert_properties`].
pub const NUM_PROP: u32 = 3;

/// Mesh buffers in the layout boolean-mesh engines expect.
///
/// Run `k` covers `tri_verts[run_index[k]..run_index[k + 1]]` and carries the
/// external material id `run_original_id[k]`; the last run extends to the end
/// of `tri_verts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMesh {
    pub num_prop: u32,
    pub vert_properties: Vec<f32>,
    pub tri_verts: Vec<u32>,
    pub run_index: Vec<u32>,
    #[serde(rename = "runOriginalID")]
    pub run_original_id: Vec<u32>,
}

impl EngineMesh {
    pub fn num_vert(&self) -> usize {
        match self.num_prop {
            0 => 0,
            n => self.vert_properties.len() / n as usize,
        }
    }

    pub fn num_tri(&self) -> usize {
        self.tri_verts.len() / 3
    }

    pub fn run_count(&self) -> usize {
        self.run_index.len()
    }

    /// Index range of run `k` inside `tri_verts`.
    pub fn run_range(&self, k: usize) -> Option<Range<usize>> {
        let start = *self.run_index.get(k)? as usize;
        let end = self
            .run_index
            .get(k + 1)
            .map_or(self.tri_verts.len(), |&next| next as usize);
        Some(start..end)
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * self.num_prop as usize;
        [
            self.vert_properties[i],
            self.vert_properties[i + 1],
            self.vert_properties[i + 2],
        ]
    }
}

/// The engine's vertex-welding step.
///
/// Implementations coalesce coincident vertices across run boundaries and
/// return `true` when the mesh was changed.
pub trait MeshMerge {
    fn merge(&mut self, mesh: &mut EngineMesh) -> bool;
}

/// Reference [`MeshMerge`] that welds vertices with bit-identical positions.
///
/// `-0.0` and `0.0` are treated as equal. Vertex order follows first use in
/// `vert_properties`; runs are untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct VertexWelder;

impl MeshMerge for VertexWelder {
    fn merge(&mut self, mesh: &mut EngineMesh) -> bool {
        let stride = mesh.num_prop as usize;
        if stride == 0 {
            return false;
        }

        let mut seen: HashMap<Vec<u32>, u32> = HashMap::new();
        let mut remap: Vec<u32> = Vec::with_capacity(mesh.num_vert());
        let mut welded: Vec<f32> = Vec::with_capacity(mesh.vert_properties.len());

        for props in mesh.vert_properties.chunks_exact(stride) {
            let key: Vec<u32> = props.iter().map(|&v| (v + 0.0).to_bits()).collect();
            let next = (welded.len() / stride) as u32;
            let target = *seen.entry(key).or_insert_with(|| {
                welded.extend_from_slice(props);
                next
            });
            remap.push(target);
        }

        if welded.len() == mesh.vert_properties.len() {
            return false;
        }

        for v in &mut mesh.tri_verts {
            if let Some(&target) = remap.get(*v as usize) {
                *v = target;
            }
        }
        debug!(
            before = remap.len(),
            after = welded.len() / stride,
            "welded coincident vertices"
        );
        mesh.vert_properties = welded;
        true
    }
}

/// Copy `mesh` into engine buffers with one run per material group.
///
/// Without explicit groups a single run on slot 0 covers the whole index
/// buffer. Groups are used in the order given and must have strictly
/// increasing starts inside the index buffer. `material_ids[slot]` is the
/// external id for a group's slot.
pub fn export_mesh(mesh: &IndexedMesh, material_ids: &[u32]) -> Result<EngineMesh, ExportError> {
    let indices = mesh.indices.as_ref().ok_or(ExportError::UnindexedMesh)?;

    if u32::try_from(mesh.vertex_count()).is_err() || u32::try_from(indices.len()).is_err() {
        return Err(ExportError::IndexOverflow);
    }

    let fallback = [MeshGroup::new(0, indices.len(), 0)];
    let groups: &[MeshGroup] = if mesh.groups.is_empty() {
        &fallback
    } else {
        &mesh.groups
    };

    let mut run_index = Vec::with_capacity(groups.len());
    let mut run_original_id = Vec::with_capacity(groups.len());

    for (k, group) in groups.iter().enumerate() {
        if k > 0 && group.start <= groups[k - 1].start {
            return Err(ExportError::UnorderedRuns { index: k });
        }
        if group.start > indices.len() {
            return Err(ExportError::RunOutOfRange { index: k });
        }
        let id = material_ids
            .get(group.material_slot)
            .copied()
            .ok_or(ExportError::MaterialNotMapped {
                slot: group.material_slot,
            })?;
        run_index.push(group.start as u32);
        run_original_id.push(id);
    }

    Ok(EngineMesh {
        num_prop: NUM_PROP,
        vert_properties: mesh.positions.clone(),
        tri_verts: indices.clone(),
        run_index,
        run_original_id,
    })
}

/// [`export_mesh`] followed by the engine's merge step.
pub fn export_and_merge<M: MeshMerge + ?Sized>(
    mesh: &IndexedMesh,
    material_ids: &[u32],
    engine: &mut M,
) -> Result<EngineMesh, ExportError> {
    let mut out = export_mesh(mesh, material_ids)?;
    let changed = engine.merge(&mut out);
    debug!(
        runs = out.run_count(),
        vertices = out.num_vert(),
        triangles = out.num_tri(),
        merged = changed,
        "exported mesh"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> IndexedMesh {
        IndexedMesh::from_buffers(
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_default_run() {
        let out = export_mesh(&two_triangles(), &[42]).unwrap();
        assert_eq!(out.num_prop, 3);
        assert_eq!(out.run_index, vec![0]);
        assert_eq!(out.run_original_id, vec![42]);
        assert_eq!(out.tri_verts, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(out.num_vert(), 4);
        assert_eq!(out.run_range(0), Some(0..6));
    }

    #[test]
    fn test_explicit_groups() {
        let mut mesh = two_triangles();
        mesh.add_group(0, 3, 1);
        mesh.add_group(3, 3, 0);

        let out = export_mesh(&mesh, &[10, 20]).unwrap();
        assert_eq!(out.run_index, vec![0, 3]);
        assert_eq!(out.run_original_id, vec![20, 10]);
        assert_eq!(out.run_range(0), Some(0..3));
        assert_eq!(out.run_range(1), Some(3..6));
        assert_eq!(out.run_range(2), None);
    }

    #[test]
    fn test_unindexed_mesh_rejected() {
        let mesh = IndexedMesh::unindexed(vec![0.0; 9]);
        assert_eq!(export_mesh(&mesh, &[1]), Err(ExportError::UnindexedMesh));
    }

    #[test]
    fn test_empty_indexed_mesh_exports() {
        let out = export_mesh(&IndexedMesh::new(), &[7]).unwrap();
        assert!(out.tri_verts.is_empty());
        assert_eq!(out.run_index, vec![0]);
        assert_eq!(out.run_original_id, vec![7]);
    }

    #[test]
    fn test_unordered_groups_rejected() {
        let mut mesh = two_triangles();
        mesh.add_group(3, 3, 0);
        mesh.add_group(0, 3, 0);
        assert_eq!(
            export_mesh(&mesh, &[1]),
            Err(ExportError::UnorderedRuns { index: 1 })
        );
    }

    #[test]
    fn test_group_past_end_rejected() {
        let mut mesh = two_triangles();
        mesh.add_group(0, 3, 0);
        mesh.add_group(9, 3, 0);
        assert_eq!(
            export_mesh(&mesh, &[1]),
            Err(ExportError::RunOutOfRange { index: 1 })
        );
    }

    #[test]
    fn test_missing_material() {
        let mut mesh = two_triangles();
        mesh.add_group(0, 6, 2);
        assert_eq!(
            export_mesh(&mesh, &[1, 2]),
            Err(ExportError::MaterialNotMapped { slot: 2 })
        );
    }

    #[test]
    fn test_welder_merges_duplicates() {
        // Two triangles sharing an edge, stored as a soup
        let mut mesh = EngineMesh {
            num_prop: 3,
            vert_properties: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                -0.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            tri_verts: vec![0, 1, 2, 3, 4, 5],
            run_index: vec![0, 3],
            run_original_id: vec![1, 2],
        };

        assert!(VertexWelder.merge(&mut mesh));
        assert_eq!(mesh.num_vert(), 4);
        assert_eq!(mesh.tri_verts, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.run_index, vec![0, 3]);
    }

    #[test]
    fn test_welder_leaves_clean_mesh() {
        let mut out = export_mesh(&two_triangles(), &[1]).unwrap();
        let before = out.clone();
        assert!(!VertexWelder.merge(&mut out));
        assert_eq!(out, before);
    }

    #[test]
    fn test_export_and_merge_uses_engine() {
        struct Counting(usize);
        impl MeshMerge for Counting {
            fn merge(&mut self, _mesh: &mut EngineMesh) -> bool {
                self.0 += 1;
                false
            }
        }

        let mut engine = Counting(0);
        export_and_merge(&two_triangles(), &[1], &mut engine).unwrap();
        assert_eq!(engine.0, 1);

        let unindexed = IndexedMesh::unindexed(vec![0.0; 9]);
        assert!(export_and_merge(&unindexed, &[1], &mut engine).is_err());
        assert_eq!(engine.0, 1);
    }

    #[test]
    fn test_json_field_names() {
        let out = export_mesh(&two_triangles(), &[5]).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["numProp"], 3);
        assert_eq!(json["runIndex"], serde_json::json!([0]));
        assert_eq!(json["runOriginalID"], serde_json::json!([5]));
        assert!(json.get("triVerts").is_some());
        assert!(json.get("vertProperties").is_some());
    }
}
