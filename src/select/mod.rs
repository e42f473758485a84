//! Interactive ray-based selection over a group topology.
//!
//! [`TopologySelector`] resolves pick rays into corner, edge or face (group)
//! selections with configurable precedence ([`SelectionSettings`]), backed by
//! a lazily-maintained [`GeometrySet`] over the topology's selectable
//! geometry and an injected surface raycast ([`MeshSpatial`]).
//! [`expand_selection_by_edge_loops`] and [`expand_selection_by_edge_rings`]
//! grow a resolved edge selection along quad-like edge flow.
//!
//! # Example
//!
//! ```
//! use polygroup::mesh::TriMesh;
//! use polygroup::topology::GroupTopology;
//! use polygroup::select::{
//!     LinearMeshSpatial, Ray3, SelectionSettings, TopologySelector,
//! };
//! use nalgebra::{Point3, Vector3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 1]).unwrap();
//! let topology = GroupTopology::new(mesh).unwrap();
//!
//! let mut selector = TopologySelector::new();
//! let spatial = LinearMeshSpatial::new(topology.mesh());
//! let ray = Ray3::new(Point3::new(0.75, 0.25, 1.0), Vector3::new(0.0, 0.0, -1.0));
//!
//! let hit = selector
//!     .find_selected_element(&topology, &ray, &SelectionSettings::default(), &spatial)
//!     .unwrap();
//! assert!(!hit.selection.groups.is_empty());
//! ```

mod expansion;
mod geometry_set;
mod selection;
mod selector;
mod spatial;

pub use expansion::{expand_selection_by_edge_loops, expand_selection_by_edge_rings};
pub use geometry_set::{
    closest_point_on_segment_to_ray, CurveEntry, GeometrySet, NearestCurve, NearestPoint,
    PointEntry,
};
pub use selection::TopologySelection;
pub use selector::{
    SelectionHit, SelectionSettings, ToleranceFn, TopologySelector,
    DEFAULT_SELECTION_TOLERANCE,
};
pub use spatial::{intersect_ray_triangle, LinearMeshSpatial, MeshSpatial, Ray3, RayHit};
