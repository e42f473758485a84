//! The mesh adapter contract consumed by the topology builder and selector.
//!
//! The group-topology algorithms never own a mesh representation; they query
//! one through the [`GroupMesh`] trait. Any triangle mesh that can answer the
//! adjacency questions below (vertex/triangle/edge iteration, edge incidence,
//! boundary classification, positions and a per-triangle group label) can
//! back a topology. [`TriMesh`](crate::mesh::TriMesh) is the reference
//! implementation shipped with the crate.

use std::sync::Arc;

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, GroupId, TriangleId, VertexId};

/// Adjacency and labeling queries over a grouped triangle mesh.
///
/// Element ids are assumed stable for the lifetime of a built topology; the
/// `max_*_id` bounds are exclusive and allow implementations with holes in
/// their id spaces (use the `is_*` membership tests when iterating).
pub trait GroupMesh {
    /// Number of vertices in the mesh.
    fn vertex_count(&self) -> usize;

    /// Number of triangles in the mesh.
    fn triangle_count(&self) -> usize;

    /// Number of undirected edges in the mesh.
    fn edge_count(&self) -> usize;

    /// Exclusive upper bound on vertex ids, for pre-sizing.
    fn max_vertex_id(&self) -> usize;

    /// Exclusive upper bound on triangle ids, for pre-sizing.
    fn max_triangle_id(&self) -> usize;

    /// Exclusive upper bound on edge ids, for pre-sizing.
    fn max_edge_id(&self) -> usize;

    /// Check whether a vertex id refers to an existing vertex.
    fn is_vertex(&self, v: VertexId) -> bool;

    /// Check whether a triangle id refers to an existing triangle.
    fn is_triangle(&self, t: TriangleId) -> bool;

    /// Check whether an edge id refers to an existing edge.
    fn is_edge(&self, e: EdgeId) -> bool;

    /// Get the position of a vertex.
    fn position(&self, v: VertexId) -> Point3<f64>;

    /// Get the group label carried by a triangle.
    fn triangle_group(&self, t: TriangleId) -> GroupId;

    /// Get the three vertices of a triangle.
    fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3];

    /// Get the three edges of a triangle, ordered so edge `i` connects
    /// vertices `i` and `(i + 1) % 3`.
    fn triangle_edges(&self, t: TriangleId) -> [EdgeId; 3];

    /// Get the two vertices of an edge.
    fn edge_vertices(&self, e: EdgeId) -> [VertexId; 2];

    /// Get the (up to two) triangles incident to an edge.
    ///
    /// The second slot is invalid for mesh-boundary edges.
    fn edge_triangles(&self, e: EdgeId) -> [TriangleId; 2];

    /// Triangles incident to a vertex.
    fn vertex_triangles(&self, v: VertexId) -> &[TriangleId];

    /// Edges incident to a vertex.
    fn vertex_edges(&self, v: VertexId) -> &[EdgeId];

    /// Check if an edge lies on the mesh boundary (one incident triangle).
    fn is_boundary_edge(&self, e: EdgeId) -> bool {
        !self.edge_triangles(e)[1].is_valid()
    }

    /// Check if a vertex lies on the mesh boundary.
    fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.vertex_edges(v).iter().any(|&e| self.is_boundary_edge(e))
    }

    /// Get the positions of a triangle's three vertices.
    fn triangle_positions(&self, t: TriangleId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle_vertices(t);
        [self.position(v0), self.position(v1), self.position(v2)]
    }

    /// Compute the normal of a triangle.
    fn triangle_normal(&self, t: TriangleId) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        e1.cross(&e2).normalize()
    }

    /// Compute the centroid of a triangle.
    fn triangle_centroid(&self, t: TriangleId) -> Point3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the midpoint of an edge.
    fn edge_midpoint(&self, e: EdgeId) -> Point3<f64> {
        let [v0, v1] = self.edge_vertices(e);
        let p0 = self.position(v0);
        let p1 = self.position(v1);
        Point3::from((p0.coords + p1.coords) * 0.5)
    }
}

impl<M: GroupMesh> GroupMesh for Arc<M> {
    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn triangle_count(&self) -> usize {
        (**self).triangle_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn max_vertex_id(&self) -> usize {
        (**self).max_vertex_id()
    }

    fn max_triangle_id(&self) -> usize {
        (**self).max_triangle_id()
    }

    fn max_edge_id(&self) -> usize {
        (**self).max_edge_id()
    }

    fn is_vertex(&self, v: VertexId) -> bool {
        (**self).is_vertex(v)
    }

    fn is_triangle(&self, t: TriangleId) -> bool {
        (**self).is_triangle(t)
    }

    fn is_edge(&self, e: EdgeId) -> bool {
        (**self).is_edge(e)
    }

    fn position(&self, v: VertexId) -> Point3<f64> {
        (**self).position(v)
    }

    fn triangle_group(&self, t: TriangleId) -> GroupId {
        (**self).triangle_group(t)
    }

    fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        (**self).triangle_vertices(t)
    }

    fn triangle_edges(&self, t: TriangleId) -> [EdgeId; 3] {
        (**self).triangle_edges(t)
    }

    fn edge_vertices(&self, e: EdgeId) -> [VertexId; 2] {
        (**self).edge_vertices(e)
    }

    fn edge_triangles(&self, e: EdgeId) -> [TriangleId; 2] {
        (**self).edge_triangles(e)
    }

    fn vertex_triangles(&self, v: VertexId) -> &[TriangleId] {
        (**self).vertex_triangles(v)
    }

    fn vertex_edges(&self, v: VertexId) -> &[EdgeId] {
        (**self).vertex_edges(v)
    }
}
