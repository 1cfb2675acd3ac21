//! Small integer handles for geometry entities.
//!
//! Every entity kind draws from its own counter, so a fresh allocator always
//! produces `0, 1, 2, ...` and test fixtures stay reproducible.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(VertexId, "v");
entity_id!(EdgeId, "e");
entity_id!(FaceId, "f");
entity_id!(LineId, "l");
entity_id!(ContourId, "c");

/// Hands out sequential ids per entity kind.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    vertices: u32,
    edges: u32,
    faces: u32,
    lines: u32,
    contours: u32,
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&mut self) -> VertexId {
        VertexId(bump(&mut self.vertices))
    }

    pub fn edge(&mut self) -> EdgeId {
        EdgeId(bump(&mut self.edges))
    }

    pub fn face(&mut self) -> FaceId {
        FaceId(bump(&mut self.faces))
    }

    pub fn line(&mut self) -> LineId {
        LineId(bump(&mut self.lines))
    }

    pub fn contour(&mut self) -> ContourId {
        ContourId(bump(&mut self.contours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_per_kind() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.vertex(), VertexId(0));
        assert_eq!(ids.vertex(), VertexId(1));
        assert_eq!(ids.face(), FaceId(0));
        assert_eq!(ids.vertex(), VertexId(2));
    }

    #[test]
    fn test_fresh_allocators_agree() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        for _ in 0..5 {
            assert_eq!(a.line(), b.line());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(EdgeId(7).to_string(), "e7");
        assert_eq!(ContourId(0).to_string(), "c0");
    }
}
