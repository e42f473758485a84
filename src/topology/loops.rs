//! Boundary loop extraction for triangle regions.
//!
//! Given a subset of a mesh's triangles, [`extract_region_boundary_loops`]
//! returns the closed, ordered loops of vertices and edges bounding the
//! region. A region edge is a boundary edge when exactly one of its incident
//! triangles belongs to the subset; chaining those edges by their shared
//! vertices yields the loops.
//!
//! Loops are oriented by the winding of the incident region triangle, so the
//! region stays on a consistent side of every loop.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TopologyError};
use crate::mesh::{EdgeId, GroupMesh, TriangleId, VertexId};

/// One closed boundary loop of a triangle region.
///
/// `edges[i]` connects `vertices[i]` to `vertices[(i + 1) % len]`; the last
/// edge wraps back to the first vertex.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    /// Ordered loop vertices.
    pub vertices: Vec<VertexId>,

    /// Ordered loop edges, parallel to `vertices`.
    pub edges: Vec<EdgeId>,
}

impl BoundaryLoop {
    /// Number of edges (equivalently, vertices) in the loop.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the loop is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Extract the boundary loops of a triangle region.
///
/// Returns one [`BoundaryLoop`] per closed boundary; a region covering a
/// closed surface component has no boundary and contributes no loops.
///
/// # Errors
///
/// Fails with [`TopologyError::NonManifoldBoundary`] when the region boundary
/// passes through a vertex more than twice (a bowtie vertex, where the loops
/// cannot be traced unambiguously), and [`TopologyError::UnclosedBoundary`]
/// when a walk dead-ends, which indicates inconsistent adjacency in the
/// underlying mesh.
pub fn extract_region_boundary_loops<M: GroupMesh>(
    mesh: &M,
    triangles: &[TriangleId],
) -> Result<Vec<BoundaryLoop>> {
    let mut in_region = vec![false; mesh.max_triangle_id()];
    for &t in triangles {
        in_region[t.index()] = true;
    }

    // Directed boundary edges, keyed by their start vertex. Direction follows
    // the incident region triangle's winding, so each interior vertex of a
    // manifold boundary has exactly one outgoing and one incoming edge.
    let mut outgoing: HashMap<VertexId, (EdgeId, VertexId)> = HashMap::new();
    let mut seen_edge = vec![false; mesh.max_edge_id()];

    for &t in triangles {
        let verts = mesh.triangle_vertices(t);
        let edges = mesh.triangle_edges(t);
        for k in 0..3 {
            let e = edges[k];
            if seen_edge[e.index()] {
                continue;
            }

            let tris = mesh.edge_triangles(e);
            let mut region_count = 0;
            for &et in &tris {
                if et.is_valid() && in_region[et.index()] {
                    region_count += 1;
                }
            }
            if region_count != 1 {
                continue;
            }
            seen_edge[e.index()] = true;

            // Direct the edge as it appears in this triangle's winding
            let start = verts[k];
            let end = verts[(k + 1) % 3];
            if outgoing.insert(start, (e, end)).is_some() {
                return Err(TopologyError::NonManifoldBoundary { vertex: start.index() });
            }
        }
    }

    // Chain directed edges into closed loops, starting from the lowest
    // unvisited vertex so loop discovery order is deterministic
    let mut loops = Vec::new();
    let mut visited: HashSet<VertexId> = HashSet::new();

    let mut starts: Vec<VertexId> = outgoing.keys().copied().collect();
    starts.sort_unstable();
    for start in starts {
        if visited.contains(&start) {
            continue;
        }

        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        let mut current = start;
        loop {
            let &(e, next) = outgoing
                .get(&current)
                .ok_or(TopologyError::UnclosedBoundary { vertex: current.index() })?;
            visited.insert(current);
            vertices.push(current);
            edges.push(e);

            current = next;
            if current == start {
                break;
            }
            if visited.contains(&current) {
                // Walked into the middle of an already-consumed chain
                return Err(TopologyError::UnclosedBoundary { vertex: current.index() });
            }
        }

        loops.push(BoundaryLoop { vertices, edges });
    }

    Ok(loops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriMesh;
    use nalgebra::Point3;

    fn grid_mesh(n: usize) -> TriMesh {
        let mut positions = Vec::new();
        let mut triangles = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                positions.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;

                triangles.push([v00, v10, v11]);
                triangles.push([v00, v11, v01]);
            }
        }

        let groups = vec![0; triangles.len()];
        TriMesh::from_triangles(&positions, &triangles, &groups).unwrap()
    }

    #[test]
    fn test_single_triangle_loop() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2]], &[0]).unwrap();

        let loops = extract_region_boundary_loops(&mesh, &[TriangleId::new(0)]).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);
    }

    #[test]
    fn test_full_grid_single_loop() {
        let mesh = grid_mesh(3);
        let all: Vec<TriangleId> = mesh.triangle_ids().collect();

        let loops = extract_region_boundary_loops(&mesh, &all).unwrap();
        assert_eq!(loops.len(), 1);
        // Perimeter of a 3x3 grid: 4 sides of 3 edges each
        assert_eq!(loops[0].len(), 12);
    }

    #[test]
    fn test_loop_is_closed_and_consistent() {
        let mesh = grid_mesh(2);
        let all: Vec<TriangleId> = mesh.triangle_ids().collect();
        let loops = extract_region_boundary_loops(&mesh, &all).unwrap();

        for lp in &loops {
            assert_eq!(lp.vertices.len(), lp.edges.len());
            for i in 0..lp.len() {
                let a = lp.vertices[i];
                let b = lp.vertices[(i + 1) % lp.len()];
                let vs = mesh.edge_vertices(lp.edges[i]);
                assert!(vs == [a, b] || vs == [b, a], "edge {} does not connect its vertices", i);
            }
        }
    }

    #[test]
    fn test_region_with_hole_yields_two_loops() {
        // 3x3 grid of cells; region excludes the center cell's two triangles
        let mesh = grid_mesh(3);
        let center_cell = 4; // cell (1,1) in row-major order
        let region: Vec<TriangleId> = mesh
            .triangle_ids()
            .filter(|t| t.index() / 2 != center_cell)
            .collect();

        let loops = extract_region_boundary_loops(&mesh, &region).unwrap();
        assert_eq!(loops.len(), 2);

        let mut lens: Vec<usize> = loops.iter().map(|l| l.len()).collect();
        lens.sort_unstable();
        // Inner loop around the missing cell has 4 edges, outer rim has 12
        assert_eq!(lens, vec![4, 12]);
    }

    #[test]
    fn test_closed_region_has_no_loops() {
        // A tetrahedron is closed; the full region has no boundary
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh = TriMesh::from_triangles(&positions, &triangles, &[0; 4]).unwrap();

        let all: Vec<TriangleId> = mesh.triangle_ids().collect();
        let loops = extract_region_boundary_loops(&mesh, &all).unwrap();
        assert!(loops.is_empty());
    }

    #[test]
    fn test_bowtie_region_fails() {
        // Two triangles sharing only vertex 2: the region boundary crosses
        // that vertex twice and cannot be traced
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [2, 3, 4]];
        let mesh = TriMesh::from_triangles(&positions, &triangles, &[0, 0]).unwrap();

        let all: Vec<TriangleId> = mesh.triangle_ids().collect();
        let result = extract_region_boundary_loops(&mesh, &all);
        assert!(matches!(
            result,
            Err(TopologyError::NonManifoldBoundary { vertex: 2 })
        ));
    }
}
