//! Indexed triangle mesh with precomputed adjacency.
//!
//! [`TriMesh`] is the reference [`GroupMesh`] implementation: a flat
//! vertex/triangle store plus an undirected edge table and per-vertex
//! incidence lists, built once at construction. Ids are dense (`0..count`).

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::adapter::GroupMesh;
use super::index::{EdgeId, GroupId, TriangleId, VertexId};
use crate::error::{Result, TopologyError};

/// An undirected mesh edge with its incident triangles.
#[derive(Debug, Clone, Copy)]
struct MeshEdge {
    /// The two endpoint vertices, lower index first.
    vertices: [VertexId; 2],

    /// Incident triangles. The second slot is invalid for boundary edges.
    triangles: [TriangleId; 2],
}

/// An indexed triangle mesh with per-triangle group labels.
///
/// Construction validates indices, rejects degenerate triangles and fails on
/// non-manifold edges (more than two incident triangles). Positions and group
/// labels may be mutated after construction; connectivity may not.
#[derive(Debug, Clone)]
pub struct TriMesh {
    positions: Vec<Point3<f64>>,
    triangles: Vec<[VertexId; 3]>,
    groups: Vec<GroupId>,
    triangle_edges: Vec<[EdgeId; 3]>,
    edges: Vec<MeshEdge>,
    vertex_triangles: Vec<Vec<TriangleId>>,
    vertex_edges: Vec<Vec<EdgeId>>,
}

impl TriMesh {
    /// Build a mesh from vertex positions, triangles and per-triangle groups.
    ///
    /// # Arguments
    /// * `positions` - List of vertex positions
    /// * `triangles` - List of triangles, each as [v0, v1, v2] indices
    /// * `groups` - One group label per triangle
    ///
    /// # Example
    /// ```
    /// use polygroup::mesh::TriMesh;
    /// use polygroup::mesh::GroupMesh;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2]], &[0]).unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.edge_count(), 3);
    /// ```
    pub fn from_triangles(
        positions: &[Point3<f64>],
        triangles: &[[usize; 3]],
        groups: &[usize],
    ) -> Result<Self> {
        if triangles.is_empty() {
            return Err(TopologyError::EmptyMesh);
        }
        if groups.len() != triangles.len() {
            return Err(TopologyError::GroupCountMismatch {
                triangles: triangles.len(),
                groups: groups.len(),
            });
        }

        // Validate vertex indices and reject degenerate triangles
        for (ti, tri) in triangles.iter().enumerate() {
            for &vi in tri {
                if vi >= positions.len() {
                    return Err(TopologyError::InvalidVertexIndex {
                        triangle: ti,
                        vertex: vi,
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(TopologyError::DegenerateTriangle { triangle: ti });
            }
        }

        let mut mesh = TriMesh {
            positions: positions.to_vec(),
            triangles: triangles
                .iter()
                .map(|t| [VertexId::new(t[0]), VertexId::new(t[1]), VertexId::new(t[2])])
                .collect(),
            groups: groups.iter().map(|&g| GroupId::new(g)).collect(),
            triangle_edges: vec![[EdgeId::invalid(); 3]; triangles.len()],
            edges: Vec::new(),
            vertex_triangles: vec![Vec::new(); positions.len()],
            vertex_edges: vec![Vec::new(); positions.len()],
        };

        // Map from undirected vertex pair (lower first) to edge ID
        let mut edge_map: HashMap<(usize, usize), EdgeId> = HashMap::new();

        for (ti, tri) in triangles.iter().enumerate() {
            let tid = TriangleId::new(ti);
            for k in 0..3 {
                mesh.vertex_triangles[tri[k]].push(tid);

                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };

                let eid = match edge_map.get(&key) {
                    Some(&eid) => {
                        let edge = &mut mesh.edges[eid.index()];
                        if edge.triangles[1].is_valid() {
                            return Err(TopologyError::NonManifoldEdge { v0: key.0, v1: key.1 });
                        }
                        edge.triangles[1] = tid;
                        eid
                    }
                    None => {
                        let eid = EdgeId::new(mesh.edges.len());
                        mesh.edges.push(MeshEdge {
                            vertices: [VertexId::new(key.0), VertexId::new(key.1)],
                            triangles: [tid, TriangleId::invalid()],
                        });
                        edge_map.insert(key, eid);
                        mesh.vertex_edges[key.0].push(eid);
                        mesh.vertex_edges[key.1].push(eid);
                        eid
                    }
                };
                mesh.triangle_edges[ti][k] = eid;
            }
        }

        Ok(mesh)
    }

    /// Build a mesh where every triangle carries the same group label.
    pub fn from_triangles_single_group(
        positions: &[Point3<f64>],
        triangles: &[[usize; 3]],
        group: usize,
    ) -> Result<Self> {
        let groups = vec![group; triangles.len()];
        Self::from_triangles(positions, triangles, &groups)
    }

    /// Set the position of a vertex.
    ///
    /// Connectivity is untouched; callers holding a selector over this mesh
    /// must invalidate its deformed-geometry flag afterwards.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, position: Point3<f64>) {
        self.positions[v.index()] = position;
    }

    /// Set the group label of a triangle.
    ///
    /// Topologies built over this mesh must be rebuilt to observe the change.
    #[inline]
    pub fn set_group(&mut self, t: TriangleId, group: GroupId) {
        self.groups[t.index()] = group;
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Find the edge connecting two vertices, if one exists.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.vertex_edges[a.index()]
            .iter()
            .copied()
            .find(|&e| {
                let vs = self.edges[e.index()].vertices;
                vs == [a, b] || vs == [b, a]
            })
    }
}

impl GroupMesh for TriMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn max_vertex_id(&self) -> usize {
        self.positions.len()
    }

    fn max_triangle_id(&self) -> usize {
        self.triangles.len()
    }

    fn max_edge_id(&self) -> usize {
        self.edges.len()
    }

    fn is_vertex(&self, v: VertexId) -> bool {
        v.is_valid() && v.index() < self.positions.len()
    }

    fn is_triangle(&self, t: TriangleId) -> bool {
        t.is_valid() && t.index() < self.triangles.len()
    }

    fn is_edge(&self, e: EdgeId) -> bool {
        e.is_valid() && e.index() < self.edges.len()
    }

    fn position(&self, v: VertexId) -> Point3<f64> {
        self.positions[v.index()]
    }

    fn triangle_group(&self, t: TriangleId) -> GroupId {
        self.groups[t.index()]
    }

    fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        self.triangles[t.index()]
    }

    fn triangle_edges(&self, t: TriangleId) -> [EdgeId; 3] {
        self.triangle_edges[t.index()]
    }

    fn edge_vertices(&self, e: EdgeId) -> [VertexId; 2] {
        self.edges[e.index()].vertices
    }

    fn edge_triangles(&self, e: EdgeId) -> [TriangleId; 2] {
        self.edges[e.index()].triangles
    }

    fn vertex_triangles(&self, v: VertexId) -> &[TriangleId] {
        &self.vertex_triangles[v.index()]
    }

    fn vertex_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.vertex_edges[v.index()]
    }
}

/// Compute the angle-weighted normal at a vertex.
///
/// Exposed for callers that render or snap to corner positions; the topology
/// algorithms themselves never need vertex normals.
pub fn vertex_normal(mesh: &TriMesh, v: VertexId) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for &t in mesh.vertex_triangles(v) {
        let [p0, p1, p2] = mesh.triangle_positions(t);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        normal += e1.cross(&e2);
    }
    normal.normalize()
}
