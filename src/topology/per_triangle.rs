//! Per-triangle group topology specialization.
//!
//! When every triangle is its own group, the general builder degenerates:
//! every referenced vertex is a corner and every mesh edge is a group edge,
//! all computable directly from edge adjacency in O(triangles) without
//! tracing any region boundaries.

use std::collections::HashMap;

use crate::mesh::{CornerId, EdgeId, GroupEdgeId, GroupId, GroupMesh, TriangleId, VertexId};

use super::group::{Corner, Group, GroupBoundary, GroupEdge, GroupTopology, Span};

impl<M: GroupMesh> GroupTopology<M> {
    /// Build the topology treating every triangle as its own group.
    ///
    /// Unlike the general builder this cannot fail: no boundary tracing is
    /// involved. Rebuilds of the returned topology take the same fast path.
    pub fn per_triangle(mesh: M) -> Self {
        let mut topology = Self::empty(
            mesh,
            Some(Box::new(|t: TriangleId| GroupId::new(t.index()))),
            true,
        );
        topology.rebuild_per_triangle();
        topology
    }

    pub(crate) fn rebuild_per_triangle(&mut self) {
        let built = {
            let mesh = &self.mesh;

            // Every vertex used by a triangle is a corner
            let mut corners: Vec<Corner> = Vec::with_capacity(mesh.vertex_count());
            let mut vertex_to_corner: HashMap<VertexId, CornerId> =
                HashMap::with_capacity(mesh.vertex_count());
            for vi in 0..mesh.max_vertex_id() {
                let v = VertexId::new(vi);
                if !mesh.is_vertex(v) || mesh.vertex_triangles(v).is_empty() {
                    continue;
                }

                let mut groups: Vec<GroupId> = mesh
                    .vertex_triangles(v)
                    .iter()
                    .map(|&t| GroupId::new(t.index()))
                    .collect();
                groups.sort_unstable();

                let cid = CornerId::new(corners.len());
                corners.push(Corner { vertex: v, groups });
                vertex_to_corner.insert(v, cid);
            }

            // Every mesh edge is a single-segment group edge
            let mut edges: Vec<GroupEdge> = Vec::with_capacity(mesh.edge_count());
            let mut edge_to_group_edge: HashMap<EdgeId, GroupEdgeId> =
                HashMap::with_capacity(mesh.edge_count());
            for ei in 0..mesh.max_edge_id() {
                let e = EdgeId::new(ei);
                if !mesh.is_edge(e) {
                    continue;
                }

                let tris = mesh.edge_triangles(e);
                let a = GroupId::new(tris[0].index());
                let b = if tris[1].is_valid() {
                    GroupId::new(tris[1].index())
                } else {
                    GroupId::invalid()
                };
                let [v0, v1] = mesh.edge_vertices(e);

                let eid = GroupEdgeId::new(edges.len());
                edge_to_group_edge.insert(e, eid);
                edges.push(GroupEdge {
                    groups: GroupId::sorted_pair(a, b),
                    span: Span {
                        vertices: vec![v0, v1],
                        edges: vec![e],
                    },
                    endpoints: [vertex_to_corner[&v0], vertex_to_corner[&v1]],
                });
            }

            // One group per triangle; its boundary is the triangle's three
            // edges in winding order
            let mut groups: Vec<Group> = Vec::with_capacity(mesh.triangle_count());
            let mut group_index: HashMap<GroupId, usize> =
                HashMap::with_capacity(mesh.triangle_count());
            for ti in 0..mesh.max_triangle_id() {
                let t = TriangleId::new(ti);
                if !mesh.is_triangle(t) {
                    continue;
                }
                let gid = GroupId::new(ti);

                let mut boundary = GroupBoundary::default();
                for &me in &mesh.triangle_edges(t) {
                    let eid = edge_to_group_edge[&me];
                    boundary.edges.push(eid);

                    let e = &edges[eid.index()];
                    if e.is_on_mesh_boundary() {
                        boundary.on_mesh_boundary = true;
                    }
                    let other = e.other_group(gid);
                    if other.is_valid() && !boundary.neighbour_groups.contains(&other) {
                        boundary.neighbour_groups.push(other);
                    }
                }

                let mut neighbour_groups = boundary.neighbour_groups.clone();
                neighbour_groups.sort_unstable();

                group_index.insert(gid, groups.len());
                groups.push(Group {
                    id: gid,
                    triangles: vec![t],
                    boundaries: vec![boundary],
                    neighbour_groups,
                });
            }

            let mut corner_edges: Vec<Vec<GroupEdgeId>> = vec![Vec::new(); corners.len()];
            for (ei, e) in edges.iter().enumerate() {
                let eid = GroupEdgeId::new(ei);
                for &c in &e.endpoints {
                    if !corner_edges[c.index()].contains(&eid) {
                        corner_edges[c.index()].push(eid);
                    }
                }
            }

            (
                groups,
                corners,
                edges,
                group_index,
                vertex_to_corner,
                edge_to_group_edge,
                corner_edges,
            )
        };

        self.groups = built.0;
        self.corners = built.1;
        self.edges = built.2;
        self.group_index = built.3;
        self.vertex_to_corner = built.4;
        self.edge_to_group_edge = built.5;
        self.corner_edges = built.6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriMesh;
    use nalgebra::Point3;

    fn tetrahedron() -> TriMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        TriMesh::from_triangles(&positions, &triangles, &[0; 4]).unwrap()
    }

    #[test]
    fn test_per_triangle_tetrahedron() {
        let topology = GroupTopology::per_triangle(tetrahedron());

        assert_eq!(topology.group_count(), 4);
        assert_eq!(topology.corner_count(), 4);
        assert_eq!(topology.edge_count(), 6);

        for group in topology.groups() {
            assert_eq!(group.boundaries.len(), 1);
            assert_eq!(group.boundaries[0].edges.len(), 3);
            // Each face of a tetrahedron borders the other three
            assert_eq!(group.neighbour_groups.len(), 3);
        }

        // Every corner touches three triangles
        for corner in topology.corners() {
            assert_eq!(corner.valence(), 3);
        }
    }

    #[test]
    fn test_per_triangle_matches_general_builder() {
        let fast = GroupTopology::per_triangle(tetrahedron());
        let general = GroupTopology::with_group_function(
            tetrahedron(),
            Box::new(|t: TriangleId| GroupId::new(t.index())),
        )
        .unwrap();

        assert_eq!(fast.group_count(), general.group_count());
        assert_eq!(fast.corner_count(), general.corner_count());
        assert_eq!(fast.edge_count(), general.edge_count());

        let pairs = |t: &GroupTopology<TriMesh>| {
            let mut p: Vec<[GroupId; 2]> = t.edges().iter().map(|e| e.groups).collect();
            p.sort_unstable();
            p
        };
        assert_eq!(pairs(&fast), pairs(&general));
    }

    #[test]
    fn test_per_triangle_open_mesh() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 0]).unwrap();
        let topology = GroupTopology::per_triangle(mesh);

        assert_eq!(topology.group_count(), 2);
        assert_eq!(topology.corner_count(), 4);
        assert_eq!(topology.edge_count(), 5);

        // Four rim edges border the mesh boundary, the diagonal is interior
        let rim = topology.edges().iter().filter(|e| e.is_on_mesh_boundary()).count();
        assert_eq!(rim, 4);
    }

    #[test]
    fn test_per_triangle_rebuild() {
        let mut topology = GroupTopology::per_triangle(tetrahedron());
        topology.rebuild_topology().unwrap();
        assert_eq!(topology.group_count(), 4);
        assert_eq!(topology.edge_count(), 6);
    }
}
