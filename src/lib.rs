//! contour3d - Extrude planar contours into indexed meshes for boolean-mesh engines

pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod profile;

pub use error::{ContourError, Error, ExportError, ExtrudeError, FaceError, ProfileError, Result};
pub use geometry::{Contour2D, Edge, Face, IdAllocator, Line2D, Point2D, Vertex};
pub use mesh::{
    EngineMesh, ExtrudeOptions, IndexedMesh, MeshGroup, MeshMerge, VertexWelder, export_and_merge,
    export_mesh, extrude_contour,
};
pub use profile::{ExtrusionProfile, ScaleRange};
