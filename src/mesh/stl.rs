use super::builder::Triangle;
use super::indexed::IndexedMesh;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a mesh to a binary STL file
///
/// Binary STL format:
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - For each triangle:
///   - 3 x f32 normal (12 bytes)
///   - 3 x 3 x f32 vertices (36 bytes)
///   - 2 byte attribute (usually 0)
///
/// Face normals are computed from the winding; unindexed meshes are read as
/// a triangle soup.
pub fn write_stl(path: &Path, mesh: &IndexedMesh) -> Result<()> {
    let triangles = expand_triangles(mesh)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_stl_to(&mut writer, &triangles)?;
    writer.flush()?;

    Ok(())
}

/// Serialize triangles as binary STL into any writer
pub fn write_stl_to<W: Write>(writer: &mut W, triangles: &[Triangle]) -> Result<()> {
    let header: [u8; 80] =
        *b"contour3d - extruded contour                                                    ";
    writer.write_all(&header)?;

    let count = u32::try_from(triangles.len()).context("Too many triangles for STL")?;
    writer.write_all(&count.to_le_bytes())?;

    for tri in triangles {
        for &n in &tri.normal {
            writer.write_all(&n.to_le_bytes())?;
        }

        for vertex in &tri.vertices {
            for &coord in vertex {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }

        // Attribute byte count
        writer.write_all(&[0u8, 0u8])?;
    }

    Ok(())
}

fn expand_triangles(mesh: &IndexedMesh) -> Result<Vec<Triangle>> {
    let vertex_count = mesh.vertex_count();
    mesh.triangles()
        .into_iter()
        .map(|tri| {
            if let Some(&bad) = tri.iter().find(|&&v| v as usize >= vertex_count) {
                bail!("Triangle references missing vertex {}", bad);
            }
            let [a, b, c] = tri.map(|v| mesh.position(v as usize));
            Ok(Triangle::new(a, b, c))
        })
        .collect()
}

/// Get the file size of an STL with the given number of triangles
pub fn estimate_stl_size(triangle_count: usize) -> usize {
    // 80 (header) + 4 (count) + triangles * (12 normal + 36 vertices + 2 attribute)
    80 + 4 + triangle_count * 50
}
