//! Index types for mesh and topology elements.
//!
//! This module provides type-safe index wrappers for the two id spaces used by
//! the library: mesh elements (vertices, triangles, edges) and topology-graph
//! elements (groups, corners, group edges). All indices are u32-backed and use
//! `u32::MAX` as an invalid/null sentinel, so the topology graph can reference
//! elements across flat arrays without pointers.

use std::fmt::{self, Debug};

/// Sentinel raw value representing an invalid index.
const INVALID: u32 = u32::MAX;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

/// A type-safe mesh-edge index (full undirected edges).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A polygroup label attached to triangles.
///
/// The invalid sentinel doubles as "no group", used for the outer side of a
/// mesh-boundary [`GroupEdge`](crate::topology::GroupEdge).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GroupId(u32);

/// A type-safe corner index into a topology's corner list.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CornerId(u32);

/// A type-safe group-edge index into a topology's edge list.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GroupEdgeId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value collides with the sentinel.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(TriangleId, "T");
impl_index_type!(EdgeId, "E");
impl_index_type!(GroupId, "G");
impl_index_type!(CornerId, "C");
impl_index_type!(GroupEdgeId, "GE");

impl GroupId {
    /// Sort two group ids into a canonical pair.
    ///
    /// Valid ids order before the invalid sentinel, so a mesh-boundary pair
    /// always has its valid group in slot 0.
    #[inline]
    pub fn sorted_pair(a: GroupId, b: GroupId) -> [GroupId; 2] {
        if a.0 <= b.0 {
            [a, b]
        } else {
            [b, a]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());

        let invalid = VertexId::invalid();
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_type_safety() {
        // These are different types and cannot be mixed
        let v = VertexId::new(0);
        let t = TriangleId::new(0);
        let g = GroupId::new(0);

        // All have the same raw value but are distinct types
        assert_eq!(v.index(), t.index());
        assert_eq!(t.index(), g.index());
    }

    #[test]
    fn test_debug_format() {
        let v = VertexId::new(42);
        assert_eq!(format!("{:?}", v), "V(42)");

        let invalid = GroupEdgeId::invalid();
        assert_eq!(format!("{:?}", invalid), "GE(INVALID)");
    }

    #[test]
    fn test_sorted_pair() {
        let a = GroupId::new(5);
        let b = GroupId::new(2);
        assert_eq!(GroupId::sorted_pair(a, b), [b, a]);
        assert_eq!(GroupId::sorted_pair(b, a), [b, a]);

        // The invalid sentinel always sorts last
        let pair = GroupId::sorted_pair(GroupId::invalid(), a);
        assert_eq!(pair, [a, GroupId::invalid()]);
    }
}
