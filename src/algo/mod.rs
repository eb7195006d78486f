//! Mesh processing algorithms on corner tables.
//!
//! This module contains the traversals the codec and the command-line tool
//! build on:
//!
//! - **Holes**: border loop enumeration, fan hole filling
//! - **Distances**: ring flood fill, shortest triangle path
//! - **Components**: edge-connected components and their extraction

pub mod components;
pub mod distance;
pub mod holes;

pub use components::{connected_components, extract_component, Components};
pub use distance::{ring_distances, triangle_path, DistanceOptions, RingDistances};
pub use holes::{border_loops, fill_holes, BorderLoop};
