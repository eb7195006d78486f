//! Corner table connectivity.
//!
//! A corner is one (vertex, triangle) incidence. Triangle `t` owns corners
//! `3t`, `3t + 1`, `3t + 2`, listed counter-clockwise. The whole connectivity of
//! a triangle mesh is two arrays indexed by corner:
//!
//! - **V**: the vertex of each corner
//! - **O**: the opposite of each corner, that is the corner of the adjacent
//!   triangle that faces the same edge from the other side
//!
//! # Border Handling
//!
//! A corner facing a border edge has no opposite. The raw O entry then holds the
//! [`CornerId::invalid`] sentinel, which [`CornerTable::raw_opposite`] returns
//! as-is. The navigation accessor [`CornerTable::opposite`] instead returns the
//! corner itself for border corners, so that `left`, `right`, and `swing` can be
//! chained across a border without branching. Code that must tell the two cases
//! apart calls [`CornerTable::is_border`].
//!
//! # Invariants
//!
//! - `num_corners == 3 * num_triangles`
//! - for a non-border corner `c`: `O[O[c]] == c`
//! - for a non-border corner `c`: `V[next(c)] == V[prev(O[c])]` and
//!   `V[prev(c)] == V[next(O[c])]`
//!
//! Tables are produced by the connectivity builder or the decoder; [`CornerTable::validate`]
//! re-checks the invariants.

use super::index::{CornerId, MeshIndex, TriangleId, VertexId};
use crate::error::{MeshError, Result};

/// Vertex and opposite arrays of a triangle mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerTable<I: MeshIndex = u32> {
    /// Vertex of each corner (V).
    pub(crate) vertices: Vec<VertexId<I>>,

    /// Raw opposite of each corner (O); `CornerId::invalid()` on border corners.
    pub(crate) opposites: Vec<CornerId<I>>,

    /// One incident corner per vertex; a corner right after a border when the
    /// vertex is on a border, so that swinging from it covers the whole fan.
    pub(crate) entry_corners: Vec<CornerId<I>>,
}

impl<I: MeshIndex> Default for CornerTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> CornerTable<I> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            opposites: Vec::new(),
            entry_corners: Vec::new(),
        }
    }

    /// Create an empty table with room for `num_triangles` triangles.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(3 * num_triangles),
            opposites: Vec::with_capacity(3 * num_triangles),
            entry_corners: Vec::with_capacity(num_vertices),
        }
    }

    /// Assemble a table from raw V and O arrays.
    ///
    /// Checks lengths and ranges and the table invariants; the sentinel
    /// `CornerId::invalid()` marks border corners in `opposites`.
    pub fn from_raw_parts(
        vertices: Vec<VertexId<I>>,
        opposites: Vec<CornerId<I>>,
        num_vertices: usize,
    ) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::CornerCountMismatch {
                num_corners: vertices.len(),
            });
        }
        if opposites.len() != vertices.len() {
            return Err(MeshError::InvalidState(format!(
                "opposite table has {} entries for {} corners",
                opposites.len(),
                vertices.len()
            )));
        }
        for (c, v) in vertices.iter().enumerate() {
            if !v.is_valid() || v.index() >= num_vertices {
                return Err(MeshError::InvalidVertexIndex {
                    triangle: c / 3,
                    vertex: v.index(),
                });
            }
        }

        let mut table = Self {
            vertices,
            opposites,
            entry_corners: Vec::new(),
        };
        table.validate()?;
        table.refresh_entry_corners(num_vertices);
        Ok(table)
    }

    // ==================== Accessors ====================

    /// Number of corners (three per triangle).
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of vertices the table was built for.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.entry_corners.len()
    }

    /// Vertex of a corner.
    #[inline]
    pub fn vertex(&self, c: CornerId<I>) -> VertexId<I> {
        self.vertices[c.index()]
    }

    /// Vertex of a corner, or [`MeshError::CornerOutOfRange`].
    pub fn try_vertex(&self, c: CornerId<I>) -> Result<VertexId<I>> {
        self.check_corner(c)?;
        Ok(self.vertex(c))
    }

    /// Raw opposite entry: the sentinel `CornerId::invalid()` on border corners.
    #[inline]
    pub fn raw_opposite(&self, c: CornerId<I>) -> CornerId<I> {
        self.opposites[c.index()]
    }

    /// True iff the raw opposite entry of `c` is the border sentinel.
    #[inline]
    pub fn is_border(&self, c: CornerId<I>) -> bool {
        !self.opposites[c.index()].is_valid()
    }

    /// Return [`MeshError::CornerOutOfRange`] unless `c` is a corner of this table.
    pub fn check_corner(&self, c: CornerId<I>) -> Result<()> {
        if c.is_valid() && c.index() < self.vertices.len() {
            Ok(())
        } else {
            Err(MeshError::CornerOutOfRange {
                corner: c.index(),
                num_corners: self.vertices.len(),
            })
        }
    }

    /// The vertex-per-corner array.
    #[inline]
    pub fn vertex_table(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// The raw opposite-per-corner array.
    #[inline]
    pub fn opposite_table(&self) -> &[CornerId<I>] {
        &self.opposites
    }

    /// Vertices of a triangle, in corner order.
    pub fn triangle_vertices(&self, t: TriangleId<I>) -> [VertexId<I>; 3] {
        let base = 3 * t.index();
        [self.vertices[base], self.vertices[base + 1], self.vertices[base + 2]]
    }

    /// A corner of `v` from which [`CornerTable::swing`] covers the whole fan.
    ///
    /// Returns `None` for vertices that no triangle references.
    pub fn entry_corner(&self, v: VertexId<I>) -> Option<CornerId<I>> {
        self.entry_corners
            .get(v.index())
            .copied()
            .filter(|c| c.is_valid())
    }

    /// True if no corner faces a border edge.
    pub fn is_closed(&self) -> bool {
        self.opposites.iter().all(|o| o.is_valid())
    }

    // ==================== Iteration ====================

    /// Iterate over all corner ids.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.vertices.len()).map(CornerId::new)
    }

    /// Iterate over all triangle ids.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        (0..self.num_triangles()).map(TriangleId::new)
    }

    /// Iterate over the corners that face a border edge.
    pub fn border_corners(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        self.corner_ids().filter(move |&c| self.is_border(c))
    }

    /// Iterate over triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [VertexId<I>; 3]> + '_ {
        self.vertices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    // ==================== Mutation (crate internal) ====================

    /// Append a triangle with border corners and return its id.
    pub(crate) fn push_triangle(&mut self, vertices: [VertexId<I>; 3]) -> TriangleId<I> {
        let t = TriangleId::new(self.num_triangles());
        self.vertices.extend_from_slice(&vertices);
        self.opposites.extend_from_slice(&[CornerId::invalid(); 3]);
        t
    }

    /// Recompute the per-vertex entry corners for `num_vertices` vertices.
    pub(crate) fn refresh_entry_corners(&mut self, num_vertices: usize) {
        let mut entry = vec![CornerId::invalid(); num_vertices];
        for c in self.corner_ids() {
            let v = self.vertex(c).index();
            if v >= num_vertices {
                continue;
            }
            // A corner whose previous corner faces a border starts its fan.
            if !entry[v].is_valid() || self.is_border(c.prev()) {
                entry[v] = c;
            }
        }
        self.entry_corners = entry;
    }

    // ==================== Validation ====================

    /// Check the table invariants, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        let num_corners = self.vertices.len();
        if num_corners % 3 != 0 {
            return Err(MeshError::CornerCountMismatch { num_corners });
        }

        for c in self.corner_ids() {
            let o = self.raw_opposite(c);
            if !o.is_valid() {
                continue;
            }
            if o.index() >= num_corners {
                return Err(MeshError::CornerOutOfRange {
                    corner: o.index(),
                    num_corners,
                });
            }
            if self.raw_opposite(o) != c {
                return Err(MeshError::InvalidState(format!(
                    "opposite of {:?} is {:?}, whose opposite is {:?}",
                    c,
                    o,
                    self.raw_opposite(o)
                )));
            }
            if self.vertex(c.next()) != self.vertex(o.prev())
                || self.vertex(c.prev()) != self.vertex(o.next())
            {
                return Err(MeshError::InvalidState(format!(
                    "corners {:?} and {:?} do not share an edge with opposite winding",
                    c, o
                )));
            }
        }

        Ok(())
    }

    /// Check if the table satisfies its invariants.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
