pub mod attributes;
pub mod contour;
pub mod ids;
pub mod primitives;
pub mod simplify;

pub use attributes::{AttributeValue, Attributes};
pub use contour::{
    CLOSURE_EPSILON, Contour2D, contour_area, contour_centroid, is_clockwise, is_contour_closed,
    reverse_contour, signed_area, validate_contour,
};
pub use ids::{ContourId, EdgeId, FaceId, IdAllocator, LineId, VertexId};
pub use primitives::{Edge, Face, Line2D, Point2D, Vertex};
pub use simplify::{dedupe_contour, simplify_contour};
