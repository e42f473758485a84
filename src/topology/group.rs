//! Group topology extraction.
//!
//! This module turns a mesh whose triangles carry integer group labels into a
//! graph of [`Group`]s, [`Corner`]s and [`GroupEdge`]s:
//!
//! - a **corner** is a mesh vertex where three or more distinct groups meet,
//!   or where exactly two groups meet on the mesh boundary;
//! - a **group edge** is a maximal run of boundary edges separating exactly
//!   two groups (or one group and the open mesh boundary);
//! - a **group boundary** is one closed loop of group edges bounding a group.
//!
//! All cross-references are integer indices into flat arrays owned by
//! [`GroupTopology`]. A group edge shared by two groups is stored once and
//! referenced from both groups' boundary lists.
//!
//! Groups are buckets by label only: if the same label is painted on two
//! disconnected regions, they form a single [`Group`] whose boundary list
//! describes several disjoint loops. Nothing downstream assumes connectivity.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::mesh::{CornerId, EdgeId, GroupEdgeId, GroupId, GroupMesh, TriangleId, VertexId};

use super::loops::{extract_region_boundary_loops, BoundaryLoop};

/// Strategy for assigning a group label to each triangle.
///
/// Injected into [`GroupTopology`] to redefine grouping (UV islands,
/// per-triangle groups, ...) without re-deriving the rest of the algorithm.
pub type GroupFunction = Box<dyn Fn(TriangleId) -> GroupId + Send + Sync>;

/// The ordered run of mesh vertices and edges making up one group edge.
///
/// For a corner-bounded edge, `vertices` has one more entry than `edges` and
/// starts/ends at the endpoint corners' vertices. For an isolated loop the
/// two lists have equal length and are cyclic (no repeated vertex).
#[derive(Debug, Clone)]
pub struct Span {
    /// Ordered vertices along the run.
    pub vertices: Vec<VertexId>,

    /// Ordered mesh edges along the run.
    pub edges: Vec<EdgeId>,
}

impl Span {
    /// Number of mesh edges in the run.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A maximal boundary run between two groups.
#[derive(Debug, Clone)]
pub struct GroupEdge {
    /// The two bordering groups, in canonical order.
    ///
    /// For a mesh-boundary edge the second slot is the invalid sentinel.
    pub groups: [GroupId; 2],

    /// The vertex/edge run of this edge.
    pub span: Span,

    /// Endpoint corners. Both invalid for an isolated loop (a closed run with
    /// no corner on it, e.g. a smooth cylinder cap).
    pub endpoints: [CornerId; 2],
}

impl GroupEdge {
    /// Check if this edge is an isolated loop (no endpoint corners).
    #[inline]
    pub fn is_loop(&self) -> bool {
        !self.endpoints[0].is_valid()
    }

    /// Check if this edge lies on the open mesh boundary.
    #[inline]
    pub fn is_on_mesh_boundary(&self) -> bool {
        !self.groups[1].is_valid()
    }

    /// Get the bordering group other than `group`.
    ///
    /// Returns the invalid sentinel when `group` is not one of the two.
    pub fn other_group(&self, group: GroupId) -> GroupId {
        if self.groups[0] == group {
            self.groups[1]
        } else if self.groups[1] == group {
            self.groups[0]
        } else {
            debug_assert!(false, "group {:?} does not border this edge", group);
            GroupId::invalid()
        }
    }

    /// Check if `corner` is one of this edge's endpoints.
    pub fn has_endpoint(&self, corner: CornerId) -> bool {
        self.endpoints[0] == corner || self.endpoints[1] == corner
    }
}

/// One closed boundary loop of one group, as an ordered list of group edges.
#[derive(Debug, Clone, Default)]
pub struct GroupBoundary {
    /// The group edges making up this loop, in traversal order.
    pub edges: Vec<GroupEdgeId>,

    /// Distinct groups on the far side of this loop's edges.
    pub neighbour_groups: Vec<GroupId>,

    /// True if any edge of this loop lies on the open mesh boundary.
    pub on_mesh_boundary: bool,
}

/// A graph node: a mesh vertex where enough distinct groups meet.
#[derive(Debug, Clone)]
pub struct Corner {
    /// The underlying mesh vertex.
    pub vertex: VertexId,

    /// Distinct groups touching this vertex, sorted.
    pub groups: Vec<GroupId>,
}

impl Corner {
    /// Number of distinct neighbouring groups.
    #[inline]
    pub fn valence(&self) -> usize {
        self.groups.len()
    }
}

/// All triangles carrying one group label, with their boundary loops.
///
/// The triangle set is not required to be connected; a label painted on two
/// disconnected regions yields one group with multiple boundary loops.
#[derive(Debug, Clone)]
pub struct Group {
    /// The group label.
    pub id: GroupId,

    /// All triangles carrying this label.
    pub triangles: Vec<TriangleId>,

    /// Closed boundary loops of the triangle set. Empty for a group covering
    /// a closed surface component.
    pub boundaries: Vec<GroupBoundary>,

    /// Distinct neighbouring groups across all boundaries, sorted.
    pub neighbour_groups: Vec<GroupId>,
}

/// The group-level topology graph of a labeled triangle mesh.
///
/// Built wholesale by [`rebuild_topology`](GroupTopology::rebuild_topology);
/// previous graph contents are discarded on every rebuild. The graph is
/// read-only to queries once built; the one sanctioned post-build mutation is
/// [`retarget_on_cloned_mesh`](GroupTopology::retarget_on_cloned_mesh).
///
/// # Example
///
/// ```
/// use polygroup::mesh::TriMesh;
/// use polygroup::topology::GroupTopology;
/// use nalgebra::Point3;
///
/// // Two triangles, two groups, sharing one edge
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 1]).unwrap();
///
/// let topology = GroupTopology::new(mesh).unwrap();
/// assert_eq!(topology.group_count(), 2);
/// ```
pub struct GroupTopology<M: GroupMesh> {
    pub(crate) mesh: M,
    pub(crate) group_fn: Option<GroupFunction>,
    pub(crate) per_triangle: bool,

    pub(crate) groups: Vec<Group>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) edges: Vec<GroupEdge>,

    pub(crate) group_index: HashMap<GroupId, usize>,
    pub(crate) vertex_to_corner: HashMap<VertexId, CornerId>,
    pub(crate) edge_to_group_edge: HashMap<EdgeId, GroupEdgeId>,
    pub(crate) corner_edges: Vec<Vec<GroupEdgeId>>,
}

impl<M: GroupMesh> GroupTopology<M> {
    /// Build a topology from the mesh's own per-triangle group labels.
    pub fn new(mesh: M) -> Result<Self> {
        let mut topology = Self::empty(mesh, None, false);
        topology.rebuild_topology()?;
        Ok(topology)
    }

    /// Build a topology with an injected group function overriding the
    /// mesh's own labels.
    pub fn with_group_function(mesh: M, group_fn: GroupFunction) -> Result<Self> {
        let mut topology = Self::empty(mesh, Some(group_fn), false);
        topology.rebuild_topology()?;
        Ok(topology)
    }

    pub(crate) fn empty(mesh: M, group_fn: Option<GroupFunction>, per_triangle: bool) -> Self {
        GroupTopology {
            mesh,
            group_fn,
            per_triangle,
            groups: Vec::new(),
            corners: Vec::new(),
            edges: Vec::new(),
            group_index: HashMap::new(),
            vertex_to_corner: HashMap::new(),
            edge_to_group_edge: HashMap::new(),
            corner_edges: Vec::new(),
        }
    }

    /// Get the group label of a triangle, honoring the injected strategy.
    pub fn group_id_for_triangle(&self, t: TriangleId) -> GroupId {
        match &self.group_fn {
            Some(f) => f(t),
            None => self.mesh.triangle_group(t),
        }
    }

    /// Recompute the whole graph from the current mesh and group function.
    ///
    /// On failure (the region boundary of some group cannot be traced into
    /// consistent loops) the topology is left empty and must not be queried;
    /// callers typically fall back to treating the mesh as ungrouped.
    pub fn rebuild_topology(&mut self) -> Result<()> {
        self.clear_graph();
        if self.per_triangle {
            self.rebuild_per_triangle();
            return Ok(());
        }

        let built = {
            let mesh = &self.mesh;
            let group_of = |t: TriangleId| -> GroupId {
                match &self.group_fn {
                    Some(f) => f(t),
                    None => mesh.triangle_group(t),
                }
            };

            // Bucket triangles by group, pre-sizing each bucket from a
            // counting pass so the fill pass never reallocates.
            let mut counts: HashMap<GroupId, usize> = HashMap::new();
            for ti in 0..mesh.max_triangle_id() {
                let t = TriangleId::new(ti);
                if !mesh.is_triangle(t) {
                    continue;
                }
                let g = group_of(t);
                debug_assert!(g.is_valid(), "triangle {:?} has no group", t);
                if g.is_valid() {
                    *counts.entry(g).or_insert(0) += 1;
                }
            }

            let mut groups: Vec<Group> = Vec::with_capacity(counts.len());
            let mut group_index: HashMap<GroupId, usize> = HashMap::with_capacity(counts.len());
            for ti in 0..mesh.max_triangle_id() {
                let t = TriangleId::new(ti);
                if !mesh.is_triangle(t) {
                    continue;
                }
                let g = group_of(t);
                if !g.is_valid() {
                    continue;
                }
                let idx = *group_index.entry(g).or_insert_with(|| {
                    groups.push(Group {
                        id: g,
                        triangles: Vec::with_capacity(counts[&g]),
                        boundaries: Vec::new(),
                        neighbour_groups: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[idx].triangles.push(t);
            }

            // Classify corner vertices and collect their neighbour groups
            let mut corners: Vec<Corner> = Vec::new();
            let mut vertex_to_corner: HashMap<VertexId, CornerId> = HashMap::new();
            for vi in 0..mesh.max_vertex_id() {
                let v = VertexId::new(vi);
                if !mesh.is_vertex(v) {
                    continue;
                }

                let mut vertex_groups: Vec<GroupId> = Vec::new();
                for &t in mesh.vertex_triangles(v) {
                    let g = group_of(t);
                    if g.is_valid() && !vertex_groups.contains(&g) {
                        vertex_groups.push(g);
                    }
                }

                let is_corner = vertex_groups.len() >= 3
                    || (vertex_groups.len() == 2 && mesh.is_boundary_vertex(v));
                if !is_corner {
                    continue;
                }

                // Neighbour set from incident edges' triangle pairs
                let mut neighbour_groups: Vec<GroupId> = Vec::new();
                for &e in mesh.vertex_edges(v) {
                    for &t in &mesh.edge_triangles(e) {
                        if !t.is_valid() {
                            continue;
                        }
                        let g = group_of(t);
                        if g.is_valid() && !neighbour_groups.contains(&g) {
                            neighbour_groups.push(g);
                        }
                    }
                }
                neighbour_groups.sort_unstable();

                let cid = CornerId::new(corners.len());
                corners.push(Corner { vertex: v, groups: neighbour_groups });
                vertex_to_corner.insert(v, cid);
            }

            // Extract per-group boundary loops and split them into group
            // edges at corners, deduplicating edges shared with an
            // already-processed group.
            let mut edges: Vec<GroupEdge> = Vec::new();
            let mut edge_to_group_edge: HashMap<EdgeId, GroupEdgeId> = HashMap::new();

            for gi in 0..groups.len() {
                let loops = extract_region_boundary_loops(mesh, &groups[gi].triangles)?;
                let gid = groups[gi].id;

                for lp in &loops {
                    let mut boundary = GroupBoundary::default();

                    let corner_positions: Vec<usize> = (0..lp.len())
                        .filter(|&i| vertex_to_corner.contains_key(&lp.vertices[i]))
                        .collect();

                    if corner_positions.is_empty() {
                        // The whole loop is one isolated group edge
                        let pair = edge_group_pair(mesh, &group_of, lp.edges[0]);
                        let eid = match find_existing_loop_edge(
                            &groups,
                            &group_index,
                            &edges,
                            pair,
                            gid,
                            lp,
                        ) {
                            Some(eid) => eid,
                            None => {
                                let eid = GroupEdgeId::new(edges.len());
                                for &me in &lp.edges {
                                    edge_to_group_edge.insert(me, eid);
                                }
                                edges.push(GroupEdge {
                                    groups: pair,
                                    span: Span {
                                        vertices: lp.vertices.clone(),
                                        edges: lp.edges.clone(),
                                    },
                                    endpoints: [CornerId::invalid(); 2],
                                });
                                eid
                            }
                        };
                        boundary.edges.push(eid);
                    } else {
                        // Split into maximal corner-to-corner spans; the last
                        // span wraps around to the first corner
                        let n = lp.len();
                        let m = corner_positions.len();
                        for k in 0..m {
                            let i0 = corner_positions[k];
                            let i1 = corner_positions[(k + 1) % m];

                            let mut span_vertices = vec![lp.vertices[i0]];
                            let mut span_edges = Vec::new();
                            let mut i = i0;
                            loop {
                                span_edges.push(lp.edges[i]);
                                i = (i + 1) % n;
                                span_vertices.push(lp.vertices[i]);
                                if i == i1 {
                                    break;
                                }
                            }

                            let pair = edge_group_pair(mesh, &group_of, span_edges[0]);
                            let start = span_vertices[0];
                            let end = *span_vertices.last().unwrap();
                            let eid = match find_existing_span_edge(
                                &groups,
                                &group_index,
                                &edges,
                                pair,
                                gid,
                                start,
                            ) {
                                Some(eid) => eid,
                                None => {
                                    let eid = GroupEdgeId::new(edges.len());
                                    let endpoints =
                                        [vertex_to_corner[&start], vertex_to_corner[&end]];
                                    for &me in &span_edges {
                                        edge_to_group_edge.insert(me, eid);
                                    }
                                    edges.push(GroupEdge {
                                        groups: pair,
                                        span: Span {
                                            vertices: span_vertices,
                                            edges: span_edges,
                                        },
                                        endpoints,
                                    });
                                    eid
                                }
                            };
                            boundary.edges.push(eid);
                        }
                    }

                    // Per-boundary neighbours across the contained edges
                    for &eid in &boundary.edges {
                        let e = &edges[eid.index()];
                        if e.is_on_mesh_boundary() {
                            boundary.on_mesh_boundary = true;
                        }
                        let other = e.other_group(gid);
                        if other.is_valid() && !boundary.neighbour_groups.contains(&other) {
                            boundary.neighbour_groups.push(other);
                        }
                    }
                    groups[gi].boundaries.push(boundary);
                }

                // Union the boundaries' neighbour lists up into the group
                let mut neighbour_groups: Vec<GroupId> = Vec::new();
                for b in &groups[gi].boundaries {
                    for &g in &b.neighbour_groups {
                        if !neighbour_groups.contains(&g) {
                            neighbour_groups.push(g);
                        }
                    }
                }
                neighbour_groups.sort_unstable();
                groups[gi].neighbour_groups = neighbour_groups;
            }

            // Per-corner incident edge lists
            let mut corner_edges: Vec<Vec<GroupEdgeId>> = vec![Vec::new(); corners.len()];
            for (ei, e) in edges.iter().enumerate() {
                let eid = GroupEdgeId::new(ei);
                for &c in &e.endpoints {
                    if c.is_valid() && !corner_edges[c.index()].contains(&eid) {
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
        Ok(())
    }

    fn clear_graph(&mut self) {
        self.groups.clear();
        self.corners.clear();
        self.edges.clear();
        self.group_index.clear();
        self.vertex_to_corner.clear();
        self.edge_to_group_edge.clear();
        self.corner_edges.clear();
    }

    // ==================== Accessors ====================

    /// The underlying mesh.
    #[inline]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Mutable access to the underlying mesh.
    ///
    /// Only position deformation is sound without a rebuild; structural edits
    /// or group repaints require [`rebuild_topology`](Self::rebuild_topology).
    #[inline]
    pub fn mesh_mut(&mut self) -> &mut M {
        &mut self.mesh
    }

    /// Swap the underlying mesh for an identical copy without touching the
    /// graph, e.g. after cloning the mesh for a background edit.
    ///
    /// The replacement must have the same element ids and connectivity; only
    /// positions may differ.
    pub fn retarget_on_cloned_mesh(&mut self, mesh: M) {
        self.mesh = mesh;
    }

    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of corners.
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Number of group edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All groups.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All corners.
    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    /// All group edges.
    #[inline]
    pub fn edges(&self) -> &[GroupEdge] {
        &self.edges
    }

    /// Get a corner by id.
    #[inline]
    pub fn corner(&self, c: CornerId) -> &Corner {
        &self.corners[c.index()]
    }

    /// Get a group edge by id.
    #[inline]
    pub fn group_edge(&self, e: GroupEdgeId) -> &GroupEdge {
        &self.edges[e.index()]
    }

    /// Find the group carrying a given label.
    pub fn find_group_by_id(&self, id: GroupId) -> Option<&Group> {
        self.group_index.get(&id).map(|&i| &self.groups[i])
    }

    /// Find the corner at a mesh vertex.
    pub fn corner_for_vertex(&self, v: VertexId) -> Option<CornerId> {
        self.vertex_to_corner.get(&v).copied()
    }

    /// Find the group edge a mesh edge belongs to.
    pub fn group_edge_for_mesh_edge(&self, e: EdgeId) -> Option<GroupEdgeId> {
        self.edge_to_group_edge.get(&e).copied()
    }

    /// Group edges incident to a corner.
    #[inline]
    pub fn corner_edges(&self, c: CornerId) -> &[GroupEdgeId] {
        &self.corner_edges[c.index()]
    }

    /// All group edges referenced by a group's boundaries, deduplicated.
    pub fn edges_of_group(&self, id: GroupId) -> Vec<GroupEdgeId> {
        let mut result = Vec::new();
        if let Some(group) = self.find_group_by_id(id) {
            for b in &group.boundaries {
                for &e in &b.edges {
                    if !result.contains(&e) {
                        result.push(e);
                    }
                }
            }
        }
        result
    }

    // ==================== Geometry ====================

    /// Position of a corner's vertex.
    pub fn corner_position(&self, c: CornerId) -> Point3<f64> {
        self.mesh.position(self.corners[c.index()].vertex)
    }

    /// The polyline of a group edge's span. Isolated loops are closed by
    /// repeating the first point.
    pub fn edge_polyline(&self, e: GroupEdgeId) -> Vec<Point3<f64>> {
        let edge = &self.edges[e.index()];
        let mut points: Vec<Point3<f64>> = edge
            .span
            .vertices
            .iter()
            .map(|&v| self.mesh.position(v))
            .collect();
        if edge.is_loop() {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        points
    }

    /// The arc-length midpoint of a group edge, used as its representative
    /// point for snapping and display.
    pub fn edge_midpoint(&self, e: GroupEdgeId) -> Point3<f64> {
        let points = self.edge_polyline(e);
        let total: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        if total <= f64::EPSILON {
            return points[0];
        }

        let mut remaining = total * 0.5;
        for w in points.windows(2) {
            let len = (w[1] - w[0]).norm();
            if remaining <= len {
                return w[0] + (w[1] - w[0]) * (remaining / len);
            }
            remaining -= len;
        }
        *points.last().unwrap()
    }

    /// Unit direction of a group edge's first span segment leaving `corner`.
    ///
    /// Returns `None` if the edge is an isolated loop, the corner is not one
    /// of its endpoints, or the segment is degenerate.
    pub fn edge_direction_from_corner(
        &self,
        e: GroupEdgeId,
        corner: CornerId,
    ) -> Option<Vector3<f64>> {
        let edge = &self.edges[e.index()];
        if edge.is_loop() || !edge.has_endpoint(corner) {
            return None;
        }

        let vs = &edge.span.vertices;
        let (from, to) = if edge.endpoints[0] == corner {
            (vs[0], vs[1])
        } else {
            (vs[vs.len() - 1], vs[vs.len() - 2])
        };

        let dir = self.mesh.position(to) - self.mesh.position(from);
        let norm = dir.norm();
        if norm <= f64::EPSILON {
            return None;
        }
        Some(dir / norm)
    }

    // ==================== Loop / ring traversal ====================

    /// The endpoint of `e` other than `corner`.
    pub fn far_endpoint(&self, e: GroupEdgeId, corner: CornerId) -> CornerId {
        let endpoints = self.edges[e.index()].endpoints;
        if endpoints[0] == corner {
            endpoints[1]
        } else {
            endpoints[0]
        }
    }

    /// The continuation of an edge loop through `corner`.
    ///
    /// Only well-defined at a valence-4 corner: the unique incident edge
    /// whose bordering groups are disjoint from the incoming edge's.
    pub fn next_edge_loop_edge(&self, e: GroupEdgeId, corner: CornerId) -> Option<GroupEdgeId> {
        if !corner.is_valid() || self.corners[corner.index()].valence() != 4 {
            return None;
        }

        let incoming = self.edges[e.index()].groups;
        self.corner_edges[corner.index()]
            .iter()
            .copied()
            .find(|&candidate| {
                if candidate == e {
                    return false;
                }
                let groups = self.edges[candidate.index()].groups;
                !groups.contains(&incoming[0]) && !groups.contains(&incoming[1])
            })
    }

    /// The continuation of an edge ring through the group `via`.
    ///
    /// Requires the boundary of `via` containing `e` to be a quad (exactly
    /// four edges); the continuation is the directly opposite edge, and the
    /// returned group is the one on its far side.
    pub fn next_edge_ring_edge(
        &self,
        e: GroupEdgeId,
        via: GroupId,
    ) -> Option<(GroupEdgeId, GroupId)> {
        let group = self.find_group_by_id(via)?;
        for boundary in &group.boundaries {
            if let Some(i) = boundary.edges.iter().position(|&b| b == e) {
                if boundary.edges.len() != 4 {
                    return None;
                }
                let next = boundary.edges[(i + 2) % 4];
                let next_group = self.edges[next.index()].other_group(via);
                return Some((next, next_group));
            }
        }
        None
    }
}

impl<M: GroupMesh> fmt::Debug for GroupTopology<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupTopology")
            .field("groups", &self.groups.len())
            .field("corners", &self.corners.len())
            .field("edges", &self.edges.len())
            .field("per_triangle", &self.per_triangle)
            .finish_non_exhaustive()
    }
}

/// The canonical group pair across a mesh edge.
fn edge_group_pair<M: GroupMesh>(
    mesh: &M,
    group_of: &impl Fn(TriangleId) -> GroupId,
    e: EdgeId,
) -> [GroupId; 2] {
    let tris = mesh.edge_triangles(e);
    let a = if tris[0].is_valid() { group_of(tris[0]) } else { GroupId::invalid() };
    let b = if tris[1].is_valid() { group_of(tris[1]) } else { GroupId::invalid() };
    GroupId::sorted_pair(a, b)
}

/// Search the other bordering group's already-built boundaries for a
/// corner-bounded edge matching this span.
///
/// The group pair plus one shared endpoint vertex uniquely identifies a
/// corner-bounded edge, so matching the span's start vertex against either
/// candidate endpoint is sufficient.
fn find_existing_span_edge(
    groups: &[Group],
    group_index: &HashMap<GroupId, usize>,
    edges: &[GroupEdge],
    pair: [GroupId; 2],
    current: GroupId,
    start: VertexId,
) -> Option<GroupEdgeId> {
    let other = if pair[0] == current { pair[1] } else { pair[0] };
    if !other.is_valid() {
        return None;
    }
    let gi = *group_index.get(&other)?;

    for boundary in &groups[gi].boundaries {
        for &eid in &boundary.edges {
            let e = &edges[eid.index()];
            if e.groups != pair || e.is_loop() {
                continue;
            }
            let vs = &e.span.vertices;
            if vs.first() == Some(&start) || vs.last() == Some(&start) {
                return Some(eid);
            }
        }
    }
    None
}

/// Search the other bordering group's already-built boundaries for an
/// isolated-loop edge matching this loop.
///
/// A loop has no canonical start and the same group pair can recur more than
/// once around one boundary (regions glued along two disjoint runs), so a
/// single shared vertex is not enough: the candidate must contain the loop's
/// first two vertices cyclically adjacent. Either direction is accepted,
/// since the two bordering groups traverse the shared loop in opposite
/// orders.
fn find_existing_loop_edge(
    groups: &[Group],
    group_index: &HashMap<GroupId, usize>,
    edges: &[GroupEdge],
    pair: [GroupId; 2],
    current: GroupId,
    lp: &BoundaryLoop,
) -> Option<GroupEdgeId> {
    let other = if pair[0] == current { pair[1] } else { pair[0] };
    if !other.is_valid() {
        return None;
    }
    let gi = *group_index.get(&other)?;

    let v0 = lp.vertices[0];
    let v1 = lp.vertices[1];

    for boundary in &groups[gi].boundaries {
        for &eid in &boundary.edges {
            let e = &edges[eid.index()];
            if e.groups != pair || !e.is_loop() {
                continue;
            }
            let vs = &e.span.vertices;
            let n = vs.len();
            for i in 0..n {
                let a = vs[i];
                let b = vs[(i + 1) % n];
                if (a == v0 && b == v1) || (a == v1 && b == v0) {
                    return Some(eid);
                }
            }
        }
    }
    None
}
