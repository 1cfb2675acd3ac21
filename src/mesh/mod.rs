pub mod builder;
pub mod export;
pub mod extrusion;
pub mod indexed;
pub mod stl;
pub mod triangulation;
pub mod validation;

pub use builder::{MeshBuilder, Triangle};
pub use export::{EngineMesh, MeshMerge, NUM_PROP, VertexWelder, export_and_merge, export_mesh};
pub use extrusion::{ExtrudeOptions, deform_in_place, deformed, extrude_contour};
pub use indexed::{Bounds3, IndexedMesh, MeshGroup};
pub use stl::write_stl;
pub use triangulation::triangulate_contour;
pub use validation::{ValidationResult, validate_mesh};
