//! Error types for clers.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, navigating, or coding a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle uses the same vertex twice.
    #[error("triangle {triangle} is degenerate (has duplicate vertices)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// A corner id lies outside `[0, num_corners)`.
    #[error("corner {corner} is out of range (mesh has {num_corners} corners)")]
    CornerOutOfRange {
        /// The offending corner id.
        corner: usize,
        /// Number of corners in the table.
        num_corners: usize,
    },

    /// A vertex id lies outside `[0, num_vertices)`.
    #[error("vertex {vertex} is out of range (mesh has {num_vertices} vertices)")]
    VertexOutOfRange {
        /// The offending vertex id.
        vertex: usize,
        /// Number of vertices in the geometry store.
        num_vertices: usize,
    },

    /// A vertex table whose length is not a multiple of three.
    #[error("vertex table has {num_corners} corners, which is not a multiple of 3")]
    CornerCountMismatch {
        /// Length of the offending vertex table.
        num_corners: usize,
    },

    /// An edge is claimed by more corners than a manifold allows.
    #[error("edge ({v0}, {v1}) has more than two incident triangles")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The triangles around a vertex do not form a single fan.
    #[error("vertex {vertex} is non-manifold (incident triangles form more than one fan)")]
    NonManifoldVertex {
        /// The vertex id.
        vertex: usize,
    },

    /// An operation that requires a closed table met a border corner.
    #[error("corner {corner} faces a border edge; a closed mesh is required")]
    OpenBoundary {
        /// A corner whose opposite is missing.
        corner: usize,
    },

    /// The traversal finished with triangles left unvisited.
    #[error("traversal visited {visited} of {total} triangles; the mesh is disconnected")]
    DisconnectedComponent {
        /// Triangles reached from the seed.
        visited: usize,
        /// Triangles in the mesh.
        total: usize,
    },

    /// The closed mesh is not a topological sphere.
    #[error("unsupported topology: Euler characteristic {euler_characteristic} (expected 2)")]
    UnsupportedTopology {
        /// V - E + F of the offending component.
        euler_characteristic: i64,
    },

    /// The decoder ran out of symbols or payload.
    #[error("stream exhausted while reading {expected} at position {position}")]
    StreamExhausted {
        /// What was being read.
        expected: &'static str,
        /// Position in the stream where reading failed.
        position: usize,
    },

    /// The stream is not the image of any valid traversal.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a malformed stream error.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        MeshError::MalformedStream(message.into())
    }
}
