//! Error types for polygroup.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`TopologyError`].
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur during mesh construction or topology extraction.
#[derive(Error, Debug)]
pub enum TopologyError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references an invalid vertex index.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle has duplicate vertex indices.
    #[error("triangle {triangle} is degenerate (has duplicate vertices)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// The number of group labels does not match the number of triangles.
    #[error("group label count {groups} does not match triangle count {triangles}")]
    GroupCountMismatch {
        /// Number of triangles.
        triangles: usize,
        /// Number of group labels.
        groups: usize,
    },

    /// An edge has more than two incident triangles.
    #[error("edge ({v0}, {v1}) has more than two incident triangles")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A region boundary passes through a vertex more than twice, so its
    /// loops cannot be traced unambiguously.
    #[error("region boundary is non-manifold at vertex {vertex}")]
    NonManifoldBoundary {
        /// The offending vertex index.
        vertex: usize,
    },

    /// A region boundary walk reached a dead end before closing its loop.
    #[error("region boundary could not be closed from vertex {vertex}")]
    UnclosedBoundary {
        /// The vertex where the walk got stuck.
        vertex: usize,
    },
}
