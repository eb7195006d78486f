//! Per-vertex and per-triangle attributes derived from a mesh.
//!
//! Attributes are computed on demand into plain vectors indexed by id. They are
//! snapshots: editing the mesh afterwards does not update them.
//!
//! [`Marks`] is the visited-flag buffer used by traversals. Every traversal
//! allocates its own, so no marker state survives between calls.

use nalgebra::Vector3;
use rayon::prelude::*;

use super::corner_mesh::CornerMesh;
use super::corner_table::CornerTable;
use super::index::{MeshIndex, TriangleId};

/// Options for attribute computation.
#[derive(Debug, Clone)]
pub struct AttributeOptions {
    /// Compute per-triangle quantities with rayon.
    pub parallel: bool,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl AttributeOptions {
    /// Enable or disable parallel computation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Derived attributes of every vertex and triangle.
#[derive(Debug, Clone)]
pub struct MeshAttributes {
    /// Number of corners of each vertex.
    pub valence: Vec<usize>,

    /// True for vertices on a border edge.
    pub border: Vec<bool>,

    /// Unnormalized triangle normals (length is twice the area).
    pub triangle_normals: Vec<Vector3<f64>>,

    /// Unit vertex normals; zero for vertices without visible triangles.
    pub vertex_normals: Vec<Vector3<f64>>,
}

impl MeshAttributes {
    /// Compute all attributes of a mesh.
    pub fn compute<I: MeshIndex>(mesh: &CornerMesh<I>, options: &AttributeOptions) -> Self {
        let triangle_normals = triangle_normals(mesh, options.parallel);
        let vertex_normals = vertex_normals(mesh, &triangle_normals);

        Self {
            valence: valences(mesh.table(), mesh.num_vertices()),
            border: border_vertices(mesh.table(), mesh.num_vertices()),
            triangle_normals,
            vertex_normals,
        }
    }
}

/// Number of corners of each vertex.
///
/// Counts corners directly, so vertices with several fans report all of them.
pub fn valences<I: MeshIndex>(table: &CornerTable<I>, num_vertices: usize) -> Vec<usize> {
    let mut valence = vec![0; num_vertices];
    for v in table.vertex_table() {
        valence[v.index()] += 1;
    }
    valence
}

/// Flag the endpoints of every border edge.
pub fn border_vertices<I: MeshIndex>(table: &CornerTable<I>, num_vertices: usize) -> Vec<bool> {
    let mut border = vec![false; num_vertices];
    for c in table.border_corners() {
        border[table.vertex(c.next()).index()] = true;
        border[table.vertex(c.prev()).index()] = true;
    }
    border
}

/// Unnormalized normal of every triangle, hidden ones included.
pub fn triangle_normals<I: MeshIndex>(mesh: &CornerMesh<I>, parallel: bool) -> Vec<Vector3<f64>> {
    let n = mesh.num_triangles();
    let compute = |t: usize| mesh.triangle_normal(TriangleId::new(t));

    if parallel {
        (0..n).into_par_iter().map(compute).collect()
    } else {
        (0..n).map(compute).collect()
    }
}

/// Normalized sum of the normals of the visible triangles around each vertex.
pub fn vertex_normals<I: MeshIndex>(
    mesh: &CornerMesh<I>,
    triangle_normals: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    let table = mesh.table();
    let mut normals = vec![Vector3::zeros(); mesh.num_vertices()];

    for c in table.corner_ids() {
        let t = c.triangle();
        if mesh.is_visible(t) {
            normals[table.vertex(c).index()] += triangle_normals[t.index()];
        }
    }

    for n in &mut normals {
        let len = n.norm();
        if len > 1e-12 {
            *n /= len;
        }
    }

    normals
}

/// Visited flags over a dense id range, with a running count.
#[derive(Debug, Clone)]
pub struct Marks {
    flags: Vec<bool>,
    count: usize,
}

impl Marks {
    /// Create `len` unmarked flags.
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
            count: 0,
        }
    }

    /// Number of flags.
    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if there are no flags at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Mark `i`; returns true if it was not marked before.
    #[inline]
    pub fn mark(&mut self, i: usize) -> bool {
        if self.flags[i] {
            false
        } else {
            self.flags[i] = true;
            self.count += 1;
            true
        }
    }

    /// Check if `i` is marked.
    #[inline]
    pub fn is_marked(&self, i: usize) -> bool {
        self.flags[i]
    }

    /// Number of marked ids.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Iterate over the unmarked ids.
    pub fn unmarked(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &m)| !m)
            .map(|(i, _)| i)
    }
}
