//! Group-level topology extraction.
//!
//! This module builds the group topology graph of a labeled triangle mesh:
//! [`GroupTopology`] owns flat lists of [`Group`]s, [`Corner`]s and
//! [`GroupEdge`]s that reference each other by index, plus the boundary-loop
//! extraction primitive ([`extract_region_boundary_loops`]) the builder runs
//! per group.
//!
//! # Example
//!
//! ```
//! use polygroup::mesh::TriMesh;
//! use polygroup::topology::GroupTopology;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 1]).unwrap();
//!
//! let topology = GroupTopology::new(mesh).unwrap();
//! assert_eq!(topology.group_count(), 2);
//! assert_eq!(topology.corner_count(), 2);
//! // One shared diagonal edge plus two mesh-boundary runs
//! assert_eq!(topology.edge_count(), 3);
//! ```

mod group;
mod loops;
mod per_triangle;

pub use group::{
    Corner, Group, GroupBoundary, GroupEdge, GroupFunction, GroupTopology, Span,
};
pub use loops::{extract_region_boundary_loops, BoundaryLoop};
