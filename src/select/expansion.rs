//! Edge loop and edge ring expansion.
//!
//! Both operations grow an already-resolved edge selection along quad-like
//! edge flow, starting from every edge currently passed in:
//!
//! - **Loop** expansion walks through corners: at a valence-4 corner the
//!   continuation is the unique incident edge whose bordering groups are
//!   disjoint from the incoming edge's.
//! - **Ring** expansion walks through groups: when the bordering group's
//!   boundary is a quad, the continuation is the directly opposite edge.
//!
//! Both walks run in both directions, stop on revisiting a selected edge, a
//! missing continuation, or the mesh boundary, and are append-only: re-running
//! on an already-expanded selection adds nothing. The return value tells the
//! caller whether the selection grew, so an unchanged selection can skip a
//! re-render.

use crate::mesh::{GroupEdgeId, GroupMesh};
use crate::topology::GroupTopology;

use super::selection::TopologySelection;

/// Expand a selection along edge loops seeded by `start_edges`.
///
/// Isolated-loop edges (no endpoint corners) are left in the selection but
/// never walked. Returns true if any edge was added.
pub fn expand_selection_by_edge_loops<M: GroupMesh>(
    topology: &GroupTopology<M>,
    selection: &mut TopologySelection,
    start_edges: &[GroupEdgeId],
) -> bool {
    let mut grew = false;

    for &start in start_edges {
        grew |= selection.insert_edge(start);

        let endpoints = topology.group_edge(start).endpoints;
        for &first_corner in &endpoints {
            if !first_corner.is_valid() {
                continue;
            }

            let mut edge = start;
            let mut corner = first_corner;
            while let Some(next) = topology.next_edge_loop_edge(edge, corner) {
                if !selection.insert_edge(next) {
                    break;
                }
                grew = true;
                corner = topology.far_endpoint(next, corner);
                if !corner.is_valid() {
                    break;
                }
                edge = next;
            }
        }
    }
    grew
}

/// Expand a selection along edge rings seeded by `start_edges`.
///
/// A ring step crosses a bordering group whose boundary is a quad to the
/// directly opposite edge; a reached mesh-boundary edge is appended before
/// the walk stops. Returns true if any edge was added.
pub fn expand_selection_by_edge_rings<M: GroupMesh>(
    topology: &GroupTopology<M>,
    selection: &mut TopologySelection,
    start_edges: &[GroupEdgeId],
) -> bool {
    let mut grew = false;

    for &start in start_edges {
        grew |= selection.insert_edge(start);

        let groups = topology.group_edge(start).groups;
        for &first_group in &groups {
            let mut edge = start;
            let mut via = first_group;
            while via.is_valid() {
                let Some((next, next_group)) = topology.next_edge_ring_edge(edge, via) else {
                    break;
                };
                if !selection.insert_edge(next) {
                    break;
                }
                grew = true;
                edge = next;
                via = next_group;
            }
        }
    }
    grew
}
