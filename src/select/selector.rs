//! Ray-based selection over a group topology.
//!
//! [`TopologySelector`] resolves a pick ray (already transformed into the
//! mesh's local space) into at most one category of selection, corner(s),
//! edge(s), or a single face, under a [`SelectionSettings`] configuration.
//! Resolution order and tie-breaks:
//!
//! 1. Raycast the mesh surface for a candidate face hit.
//! 2. Search corners within tolerance; in down-ray mode collect every corner
//!    colinear with the closest one. With projected-element preference, a
//!    corner whose incident edge runs down the ray promotes to that edge.
//! 3. Search edge polylines the same way. With projected-element preference,
//!    an edge seen exactly edge-on promotes to the face it borders.
//! 4. Discard corner/edge candidates hidden behind the surface, unless
//!    occlusion is ignored.
//! 5. When a corner and an edge both survive, keep the one passing the
//!    tighter tolerance; a face candidate wins over either unless the click
//!    was very precise.
//! 6. Otherwise fall back to the face hit's group.
//!
//! The selector keeps a lazily-built [`GeometrySet`] over the topology's
//! corners and edges with two dirty flags: deformation re-uploads positions
//! into the existing structure, topology modification rebuilds it. Callers
//! must invalidate the right flag after editing the mesh, and serialize all
//! mutation and queries on one thread.

use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::mesh::{CornerId, GroupEdgeId, GroupId, GroupMesh, TriangleId};
use crate::topology::GroupTopology;

use super::geometry_set::{GeometrySet, NearestCurve, NearestPoint};
use super::selection::TopologySelection;
use super::spatial::{MeshSpatial, Ray3};

/// Default world-space tolerance of the built-in closeness test.
pub const DEFAULT_SELECTION_TOLERANCE: f64 = 0.01;

/// Tighter tolerance scale deciding corner-vs-edge ties.
const CORNER_EDGE_TOLERANCE_SCALE: f64 = 0.75;

/// Very tight tolerance scale letting a corner/edge beat a face hit.
const FACE_OVERRIDE_TOLERANCE_SCALE: f64 = 0.15;

/// How close a unit dot product must be to 1 to count as colinear.
const COLINEARITY_EPSILON: f64 = 1e-6;

/// How close a normal-dot-ray must be to 0 for a face seen edge-on.
const EDGE_ON_EPSILON: f64 = 1e-6;

/// Closeness predicate over 3D points: `(candidate, ray_point, tolerance
/// scale) -> within`. Typically Euclidean distance against a screen-space
/// derived tolerance.
pub type ToleranceFn = Box<dyn Fn(&Point3<f64>, &Point3<f64>, f64) -> bool + Send + Sync>;

/// Which element kinds a query may select, and how ties are resolved.
#[derive(Debug, Clone, Copy)]
pub struct SelectionSettings {
    /// Allow face (group) hits.
    pub enable_face_hits: bool,

    /// Allow group-edge hits.
    pub enable_edge_hits: bool,

    /// Allow corner hits.
    pub enable_corner_hits: bool,

    /// Collect all coincident features down the ray instead of only the
    /// nearest one (orthographic-viewport convenience).
    pub select_down_ray: bool,

    /// Prefer the higher-dimensional element a candidate projects onto along
    /// the ray: an edge colinear with the ray over its corner, the face seen
    /// edge-on over its edge.
    pub prefer_projected_element: bool,

    /// Skip the occlusion raycast for corner/edge candidates.
    pub ignore_occlusion: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            enable_face_hits: true,
            enable_edge_hits: true,
            enable_corner_hits: true,
            select_down_ray: false,
            prefer_projected_element: false,
            ignore_occlusion: false,
        }
    }
}

impl SelectionSettings {
    /// Set which element kinds are eligible.
    pub fn with_enabled(mut self, faces: bool, edges: bool, corners: bool) -> Self {
        self.enable_face_hits = faces;
        self.enable_edge_hits = edges;
        self.enable_corner_hits = corners;
        self
    }

    /// Set down-ray collection.
    pub fn with_down_ray(mut self, down_ray: bool) -> Self {
        self.select_down_ray = down_ray;
        self
    }

    /// Set projected-element preference.
    pub fn with_prefer_projected(mut self, prefer: bool) -> Self {
        self.prefer_projected_element = prefer;
        self
    }

    /// Set whether occlusion is ignored.
    pub fn with_ignore_occlusion(mut self, ignore: bool) -> Self {
        self.ignore_occlusion = ignore;
        self
    }
}

/// A resolved selection with its 3D hit position and, for a face hit, the
/// face normal.
#[derive(Debug, Clone)]
pub struct SelectionHit {
    /// The selected elements (at most one category populated).
    pub selection: TopologySelection,

    /// The 3D position of the hit.
    pub position: Point3<f64>,

    /// The face normal, for face selections.
    pub normal: Option<Vector3<f64>>,
}

/// Resolves pick rays against a built [`GroupTopology`].
///
/// The selector never mutates the topology; it caches selectable geometry and
/// expects the same topology to be passed to every query until
/// [`invalidate`](Self::invalidate) is called. The surface raycast is
/// injected per query so callers control acceleration-structure freshness.
pub struct TopologySelector {
    geometry: GeometrySet,
    geometry_built: bool,
    geometry_current: bool,
    points_within_tolerance: ToleranceFn,
}

impl Default for TopologySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologySelector {
    /// Create a selector with the default Euclidean tolerance test.
    pub fn new() -> Self {
        Self {
            geometry: GeometrySet::new(),
            geometry_built: false,
            geometry_current: false,
            points_within_tolerance: euclidean_tolerance(DEFAULT_SELECTION_TOLERANCE),
        }
    }

    /// Replace the closeness test with Euclidean distance against a fixed
    /// world-space tolerance.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.points_within_tolerance = euclidean_tolerance(tolerance);
    }

    /// Replace the closeness test wholesale, e.g. with a screen-space
    /// derived predicate.
    pub fn set_tolerance_test(&mut self, test: ToleranceFn) {
        self.points_within_tolerance = test;
    }

    /// Mark the cached selectable geometry stale.
    ///
    /// Pass `deformed` after vertex positions changed (cheap re-upload) and
    /// `modified` after the topology was rebuilt (full reconstruction).
    pub fn invalidate(&mut self, deformed: bool, modified: bool) {
        if modified {
            self.geometry_built = false;
        }
        if deformed {
            self.geometry_current = false;
        }
    }

    fn refresh_geometry<M: GroupMesh>(&mut self, topology: &GroupTopology<M>) {
        if !self.geometry_built {
            self.geometry.clear();
            for ci in 0..topology.corner_count() {
                self.geometry
                    .add_point(ci, topology.corner_position(CornerId::new(ci)));
            }
            for ei in 0..topology.edge_count() {
                self.geometry
                    .add_curve(ei, topology.edge_polyline(GroupEdgeId::new(ei)));
            }
            self.geometry_built = true;
            self.geometry_current = true;
        } else if !self.geometry_current {
            self.geometry
                .update_points(|id| topology.corner_position(CornerId::new(id)));
            self.geometry
                .update_curves(|id| topology.edge_polyline(GroupEdgeId::new(id)));
            self.geometry_current = true;
        }
    }

    /// Resolve a pick ray into a selection.
    ///
    /// Returns `None` when nothing eligible is within tolerance.
    pub fn find_selected_element<M: GroupMesh>(
        &mut self,
        topology: &GroupTopology<M>,
        ray: &Ray3,
        settings: &SelectionSettings,
        spatial: &dyn MeshSpatial,
    ) -> Option<SelectionHit> {
        self.refresh_geometry(topology);
        let geometry = &self.geometry;
        let tol = &self.points_within_tolerance;

        let face_hit = if settings.enable_face_hits {
            spatial.find_nearest_hit_triangle(ray)
        } else {
            None
        };

        // Corner candidates, closest along the ray first
        let mut corner_hits: Vec<NearestPoint> = Vec::new();
        if settings.enable_corner_hits {
            if settings.select_down_ray {
                let all = geometry.collect_points_near_ray(ray, |p, q| tol(p, q, 1.0));
                corner_hits = down_ray_points(ray, all);
            } else if let Some(hit) =
                geometry.find_nearest_point_to_ray(ray, |p, q| tol(p, q, 1.0))
            {
                corner_hits.push(hit);
            }
            if !settings.ignore_occlusion {
                corner_hits.retain(|h| !spatial.is_occluded(&h.position, &ray.origin));
            }
        }

        // A corner whose incident edge runs down the ray selects that edge
        if settings.prefer_projected_element
            && settings.enable_edge_hits
            && !corner_hits.is_empty()
        {
            let closest = corner_hits[0];
            if let Some(e) =
                colinear_edge_at_corner(topology, CornerId::new(closest.id), ray, false)
            {
                let mut selection = TopologySelection::new();
                selection.insert_edge(e);
                // The other down-ray corners' edges may point away from the
                // camera, so their colinearity uses the absolute dot
                for other in corner_hits.iter().skip(1) {
                    if let Some(e) =
                        colinear_edge_at_corner(topology, CornerId::new(other.id), ray, true)
                    {
                        selection.insert_edge(e);
                    }
                }
                return Some(SelectionHit {
                    selection,
                    position: closest.position,
                    normal: None,
                });
            }
        }

        // Edge candidates, closest along the ray first
        let mut edge_hits: Vec<NearestCurve> = Vec::new();
        if settings.enable_edge_hits {
            if settings.select_down_ray {
                let all = geometry.collect_curves_near_ray(ray, |p, q| tol(p, q, 1.0));
                edge_hits = down_ray_curves(ray, all);
            } else if let Some(hit) =
                geometry.find_nearest_curve_to_ray(ray, |p, q| tol(p, q, 1.0))
            {
                edge_hits.push(hit);
            }
            if !settings.ignore_occlusion {
                edge_hits.retain(|h| !spatial.is_occluded(&h.position, &ray.origin));
            }
        }

        // An edge seen exactly edge-on selects the face it borders
        if settings.prefer_projected_element
            && settings.enable_face_hits
            && !edge_hits.is_empty()
        {
            let closest = edge_hits[0];
            if let Some((group, triangle)) = bordered_face_along_ray(topology, &closest, ray) {
                let mut selection = TopologySelection::new();
                selection.insert_group(group);
                for other in edge_hits.iter().skip(1) {
                    if let Some((g, _)) = bordered_face_along_ray(topology, other, ray) {
                        selection.insert_group(g);
                    }
                }
                return Some(SelectionHit {
                    selection,
                    position: closest.position,
                    normal: Some(topology.mesh().triangle_normal(triangle)),
                });
            }
        }

        // Corner vs edge: keep whichever passes the tighter tolerance
        let mut use_corners = !corner_hits.is_empty();
        let mut use_edges = !edge_hits.is_empty();
        if use_corners && use_edges {
            let c = corner_hits[0].position;
            if tol(&c, &ray.nearest_point(&c), CORNER_EDGE_TOLERANCE_SCALE) {
                use_edges = false;
            } else {
                use_corners = false;
            }
        }

        // A face hit wins unless the corner/edge click was very precise
        if face_hit.is_some() {
            if use_corners {
                let c = corner_hits[0].position;
                if !tol(&c, &ray.nearest_point(&c), FACE_OVERRIDE_TOLERANCE_SCALE) {
                    use_corners = false;
                }
            }
            if use_edges {
                let e = edge_hits[0].position;
                if !tol(&e, &ray.nearest_point(&e), FACE_OVERRIDE_TOLERANCE_SCALE) {
                    use_edges = false;
                }
            }
        }

        if use_corners {
            let mut selection = TopologySelection::new();
            for h in &corner_hits {
                selection.insert_corner(CornerId::new(h.id));
            }
            return Some(SelectionHit {
                selection,
                position: corner_hits[0].position,
                normal: None,
            });
        }

        if use_edges {
            let mut selection = TopologySelection::new();
            for h in &edge_hits {
                selection.insert_edge(GroupEdgeId::new(h.id));
            }
            return Some(SelectionHit {
                selection,
                position: edge_hits[0].position,
                normal: None,
            });
        }

        if let Some(hit) = face_hit {
            let mut selection = TopologySelection::new();
            selection.insert_group(topology.group_id_for_triangle(hit.triangle));
            return Some(SelectionHit {
                selection,
                position: hit.position,
                normal: Some(topology.mesh().triangle_normal(hit.triangle)),
            });
        }

        None
    }
}

impl fmt::Debug for TopologySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologySelector")
            .field("geometry_built", &self.geometry_built)
            .field("geometry_current", &self.geometry_current)
            .finish_non_exhaustive()
    }
}

fn euclidean_tolerance(tolerance: f64) -> ToleranceFn {
    Box::new(move |a, b, scale| (a - b).norm() <= tolerance * scale)
}

/// Keep the closest candidate and every other one exactly colinear with it
/// along the ray. Input must be sorted by ray parameter.
fn down_ray_points(ray: &Ray3, all: Vec<NearestPoint>) -> Vec<NearestPoint> {
    let Some(&closest) = all.first() else {
        return all;
    };
    all.into_iter()
        .filter(|h| is_down_ray(ray, &closest.position, &h.position))
        .collect()
}

fn down_ray_curves(ray: &Ray3, all: Vec<NearestCurve>) -> Vec<NearestCurve> {
    let Some(closest) = all.first().copied() else {
        return all;
    };
    all.into_iter()
        .filter(|h| is_down_ray(ray, &closest.position, &h.position))
        .collect()
}

fn is_down_ray(ray: &Ray3, closest: &Point3<f64>, candidate: &Point3<f64>) -> bool {
    let offset = candidate - closest;
    let norm = offset.norm();
    if norm <= f64::EPSILON {
        return true;
    }
    offset.dot(&ray.direction()) / norm > 1.0 - COLINEARITY_EPSILON
}

/// Find an edge at `corner` whose first segment runs along the ray.
fn colinear_edge_at_corner<M: GroupMesh>(
    topology: &GroupTopology<M>,
    corner: CornerId,
    ray: &Ray3,
    absolute: bool,
) -> Option<GroupEdgeId> {
    for &e in topology.corner_edges(corner) {
        if let Some(dir) = topology.edge_direction_from_corner(e, corner) {
            let mut d = dir.dot(&ray.direction());
            if absolute {
                d = d.abs();
            }
            if d > 1.0 - COLINEARITY_EPSILON {
                return Some(e);
            }
        }
    }
    None
}

/// For an edge candidate seen edge-on, pick the bordered face lying forward
/// of the edge along the ray.
///
/// The candidate mesh edge's incident triangle qualifies when its plane
/// contains the ray direction; between the two, the winner is the one whose
/// opposite vertex sits on the same side of the edge as the ray direction
/// (cross-product sidedness).
fn bordered_face_along_ray<M: GroupMesh>(
    topology: &GroupTopology<M>,
    hit: &NearestCurve,
    ray: &Ray3,
) -> Option<(GroupId, TriangleId)> {
    let edge = topology.group_edge(GroupEdgeId::new(hit.id));
    let mesh_edge = edge.span.edges[hit.segment];
    let mesh = topology.mesh();

    let [a, b] = mesh.edge_vertices(mesh_edge);
    let pa = mesh.position(a);
    let edge_vector = mesh.position(b) - pa;

    let side_reference = edge_vector.cross(&ray.direction());
    if side_reference.norm() <= f64::EPSILON {
        // Ray runs along the edge; no defined side
        return None;
    }

    for &t in &mesh.edge_triangles(mesh_edge) {
        if !t.is_valid() {
            continue;
        }
        if mesh.triangle_normal(t).dot(&ray.direction()).abs() >= EDGE_ON_EPSILON {
            continue;
        }

        let opposite = mesh
            .triangle_vertices(t)
            .into_iter()
            .find(|&v| v != a && v != b);
        let Some(w) = opposite else { continue };

        let side = edge_vector
            .cross(&(mesh.position(w) - pa))
            .dot(&side_reference);
        if side > 0.0 {
            return Some((topology.group_id_for_triangle(t), t));
        }
    }
    None
}
