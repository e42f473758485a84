//! # Polygroup
//!
//! Group-level topology graphs and interactive ray-based selection for
//! triangle meshes whose triangles carry integer "polygroup" labels.
//!
//! Polygroup turns "triangle → group id" into a graph of groups, corners and
//! group edges with closed boundary loops, and resolves pick rays against
//! that graph (corners, group edges, or faces) with configurable precedence
//! rules, occlusion filtering, and loop/ring traversal for quad-like edge
//! flow selection.
//!
//! ## Features
//!
//! - **Topology extraction**: corners where 3+ groups meet, maximal boundary
//!   runs shared between exactly two groups, per-group boundary loops,
//!   isolated loops for smooth closed seams
//! - **Index-based graph**: groups, corners and edges cross-reference by
//!   integer index into flat arrays, never by pointer
//! - **Injectable grouping**: substitute any `Fn(TriangleId) -> GroupId`
//!   strategy (UV islands, per-triangle groups, ...) without re-deriving the
//!   algorithm
//! - **Ray selection**: nearest or down-ray candidate collection, projected
//!   element preference, occlusion tests, corner/edge/face tie-breaking
//! - **Loop and ring expansion**: grow an edge selection along quad flow
//!
//! ## Quick Start
//!
//! ```
//! use polygroup::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! // A quad split into two one-triangle groups
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 1]).unwrap();
//!
//! // Build the group topology graph
//! let topology = GroupTopology::new(mesh).unwrap();
//! assert_eq!(topology.group_count(), 2);
//! assert_eq!(topology.edge_count(), 3); // shared diagonal + two rim runs
//!
//! // Resolve a pick ray against it
//! let mut selector = TopologySelector::new();
//! let spatial = LinearMeshSpatial::new(topology.mesh());
//! let ray = Ray3::new(Point3::new(0.75, 0.25, 1.0), Vector3::new(0.0, 0.0, -1.0));
//! let hit = selector
//!     .find_selected_element(&topology, &ray, &SelectionSettings::default(), &spatial)
//!     .unwrap();
//! assert_eq!(hit.selection.groups.len(), 1);
//! ```
//!
//! ## Collaborator Seams
//!
//! The algorithms consume the mesh through the [`mesh::GroupMesh`] trait and
//! the surface raycast through [`select::MeshSpatial`], so both can be backed
//! by an existing mesh library or acceleration structure. [`mesh::TriMesh`]
//! and [`select::LinearMeshSpatial`] are the shipped reference
//! implementations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mesh;
pub mod select;
pub mod topology;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use polygroup::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, TopologyError};
    pub use crate::mesh::{
        CornerId, EdgeId, GroupEdgeId, GroupId, GroupMesh, TriMesh, TriangleId, VertexId,
    };
    pub use crate::select::{
        expand_selection_by_edge_loops, expand_selection_by_edge_rings, LinearMeshSpatial,
        MeshSpatial, Ray3, SelectionHit, SelectionSettings, TopologySelection, TopologySelector,
    };
    pub use crate::topology::{
        Corner, Group, GroupBoundary, GroupEdge, GroupTopology, Span,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
