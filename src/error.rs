use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Problems with the shape of an input contour.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContourError {
    #[error("contour needs at least {min} points, got {actual}")]
    TooFewPoints { min: usize, actual: usize },

    /// Edge `index` runs from point `index` to the next one (wrapping).
    #[error("degenerate contour edge at index {index}")]
    DegenerateEdge { index: usize },

    #[error("contour encloses no area")]
    ZeroArea,

    #[error("contour point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FaceError {
    #[error("face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// Errors raised by the extrusion engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtrudeError {
    #[error("invalid contour: {0}")]
    InvalidContour(#[from] ContourError),

    #[error("invalid extrusion options: {0}")]
    InvalidOptions(String),

    #[error("cap triangulation failed")]
    Triangulation,
}

/// Errors raised while packaging a mesh for the boolean engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("mesh has no index buffer")]
    UnindexedMesh,

    #[error("no material id mapped for slot {slot}")]
    MaterialNotMapped { slot: usize },

    /// Group `index` does not start after the previous group.
    #[error("material run {index} does not start after the previous run")]
    UnorderedRuns { index: usize },

    #[error("material run {index} starts past the end of the index buffer")]
    RunOutOfRange { index: usize },

    #[error("mesh buffers exceed u32 index range")]
    IndexOverflow,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("profile contour must be closed")]
    OpenContour,

    #[error("extrusion direction has zero length")]
    ZeroDirection,

    #[error("scale range start must be positive and finite, got {0}")]
    InvalidScale(f64),
}

/// Top-level error for the contour-to-mesh pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Face(#[from] FaceError),

    #[error(transparent)]
    Extrude(#[from] ExtrudeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}
