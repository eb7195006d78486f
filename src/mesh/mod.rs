//! Core mesh data structures.
//!
//! This module provides the corner-table mesh representation and related types
//! for representing and navigating triangle meshes.
//!
//! # Overview
//!
//! The primary type is [`CornerMesh`], which pairs a [`Geometry`] store of
//! vertex positions with a [`CornerTable`]. The corner table encodes the full
//! connectivity of a triangle mesh in two arrays indexed by corner, and the
//! navigation operators (`next`, `prev`, `opposite`, `left`, `right`, `swing`)
//! answer every adjacency query in O(1).
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`CornerId`] - Identifies a corner; triangle `t` owns corners `3t..3t + 3`
//! - [`VertexId`] - Identifies a vertex
//! - [`TriangleId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are typically constructed from file I/O or from face-vertex lists:
//!
//! ```
//! use clers::mesh::{build_from_triangles, CornerId, CornerMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let triangles = vec![[0, 1, 2]];
//!
//! let mesh: CornerMesh = build_from_triangles(&positions, &triangles).unwrap();
//! let c = CornerId::new(0);
//! assert!(mesh.table().is_border(c));
//! assert_eq!(mesh.table().opposite(c), c);
//! ```

mod attributes;
mod builder;
mod corner_mesh;
mod corner_table;
mod geometry;
mod index;
mod navigator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use attributes::{
    border_vertices, triangle_normals, valences, vertex_normals, AttributeOptions, Marks,
    MeshAttributes,
};
pub use builder::{
    build_corner_table, build_from_triangles, build_from_triangles_with_options,
    build_opposites_bucketed, build_opposites_naive, to_face_vertex, BuildOptions, BuildStrategy,
    NonManifoldPolicy,
};
pub use corner_mesh::CornerMesh;
pub use corner_table::CornerTable;
pub use geometry::Geometry;
pub use index::{CornerId, MeshIndex, TriangleId, VertexId};
pub use navigator::Ring;
