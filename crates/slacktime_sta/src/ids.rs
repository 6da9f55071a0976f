//! Opaque ID newtypes for timing graph entities.
//!
//! [`VertexId`] and [`EdgeId`] are thin `u32` wrappers used as arena
//! indices into the timing graph. They are `Copy`, `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns this ID as a `usize` for indexing into an arena
            /// array (`vertices`, `out_edges`, the forward/backward
            /// per-vertex result vectors, ...). Centralizing the cast here
            /// means the arena-indexing idiom reads the same everywhere a
            /// pass walks `TimingGraph` by ID.
            pub fn as_index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a vertex in the timing graph.
    VertexId
);

define_id!(
    /// Opaque, copyable ID for an edge in the timing graph.
    EdgeId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_id_roundtrip() {
        let id = VertexId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn edge_id_roundtrip() {
        let id = EdgeId::from_raw(99);
        assert_eq!(id.as_raw(), 99);
    }

    #[test]
    fn node_id_equality() {
        let a = VertexId::from_raw(7);
        let b = VertexId::from_raw(7);
        let c = VertexId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn node_id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(VertexId::from_raw(1));
        set.insert(VertexId::from_raw(2));
        set.insert(VertexId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn node_id_serde_roundtrip() {
        let id = VertexId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn edge_id_serde_roundtrip() {
        let id = EdgeId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: EdgeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn id_zero_and_max() {
        let zero = VertexId::from_raw(0);
        let max = VertexId::from_raw(u32::MAX);
        assert_eq!(zero.as_raw(), 0);
        assert_eq!(max.as_raw(), u32::MAX);
        assert_ne!(zero, max);
    }

    #[test]
    fn id_debug_format() {
        let id = EdgeId::from_raw(42);
        let debug = format!("{id:?}");
        assert!(debug.contains("42"));
    }

    #[test]
    fn as_index_matches_as_raw() {
        // `as_index` backs every arena lookup (TimingGraph::vertex/edge, the
        // forward/backward result vectors); it must never diverge from the
        // raw id used for serde and equality.
        let v = VertexId::from_raw(17);
        assert_eq!(v.as_index(), 17usize);
        let e = EdgeId::from_raw(0);
        assert_eq!(e.as_index(), 0usize);
    }
}
