//! # Clers
//!
//! Corner-table triangle meshes and Edgebreaker connectivity compression.
//!
//! Clers stores a triangle mesh as two flat arrays indexed by corner: the
//! vertex of each corner and the corner facing it across the opposite edge.
//! Every adjacency query reduces to a few integer operations on those arrays,
//! and the Edgebreaker codec uses them to turn a closed manifold mesh into a
//! string of `C`, `L`, `E`, `R`, `S` symbols, one per triangle, and back.
//!
//! ## Features
//!
//! - **Corner table**: O(1) `next`, `prev`, `opposite`, `left`, `right`, `swing`
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Connectivity builder**: naive and bucketed opposite construction with a
//!   configurable policy for non-manifold edges
//! - **Edgebreaker codec**: CLERS encoding and wrap-and-zip decoding, with hole
//!   filling for meshes that have borders
//! - **File formats**: OBJ and PLY meshes, plus a bit-packed container for
//!   compressed meshes
//!
//! ## Quick Start
//!
//! ```no_run
//! use clers::prelude::*;
//!
//! // Load a mesh
//! let mesh: CornerMesh = clers::io::load("model.obj").unwrap();
//!
//! // Compress it
//! let encoding = encode(&mesh, &EncodeOptions::default()).unwrap();
//! println!("{}", encoding.compressed.stats());
//! std::fs::write("model.clers", encoding.compressed.to_bytes().unwrap()).unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use clers::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let triangles = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh: CornerMesh = build_from_triangles(&vertices, &triangles).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_triangles(), 4);
//! assert!(mesh.table().is_closed());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use clers::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! #     Point3::new(0.5, 0.5, 1.0),
//! # ];
//! # let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! # let mesh: CornerMesh = build_from_triangles(&vertices, &triangles).unwrap();
//! let table = mesh.table();
//! let c = CornerId::new(0);
//!
//! // Corners of the same triangle
//! assert_eq!(c.next().next().next(), c);
//!
//! // The corner across the edge facing c
//! let o = table.opposite(c);
//! assert_eq!(table.opposite(o), c);
//!
//! // Corners around the vertex of c
//! let fan: Vec<CornerId> = table.ring(c).collect();
//! assert_eq!(fan.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod codec;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use clers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::codec::{
        decode, encode, ClersStats, CompressedMesh, EncodeOptions, Encoding, Symbol,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, BuildOptions, CornerId, CornerMesh, CornerTable,
        MeshIndex, TriangleId, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
