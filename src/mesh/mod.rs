//! Mesh abstraction consumed by the topology algorithms.
//!
//! The topology builder and selector treat the mesh as an external
//! collaborator, queried through the [`GroupMesh`] trait: triangle/vertex/edge
//! iteration, edge incidence, boundary classification, vertex positions and a
//! per-triangle group label. This module provides the trait, the typed element
//! indices used across the crate, and [`TriMesh`], a compact indexed triangle
//! mesh implementing the contract.
//!
//! # Index Types
//!
//! Elements are identified by u32-backed index wrappers with an invalid
//! sentinel: [`VertexId`], [`TriangleId`], [`EdgeId`] for mesh elements, and
//! [`GroupId`], [`CornerId`], [`GroupEdgeId`] for topology-graph elements.
//!
//! # Construction
//!
//! ```
//! use polygroup::mesh::TriMesh;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2]], &[0]).unwrap();
//! ```

mod adapter;
mod index;
mod trimesh;

pub use adapter::GroupMesh;
pub use index::{CornerId, EdgeId, GroupEdgeId, GroupId, TriangleId, VertexId};
pub use trimesh::{vertex_normal, TriMesh};
