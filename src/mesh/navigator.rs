//! Corner navigation algebra.
//!
//! The operators come in two groups:
//!
//! - pure arithmetic on corner ids, needing no table: [`CornerId::triangle`],
//!   [`CornerId::next`], [`CornerId::prev`]
//! - operators that read the opposite array: [`CornerTable::opposite`],
//!   [`CornerTable::left`], [`CornerTable::right`], [`CornerTable::swing`]
//!
//! For a corner `c` with vertex `v`, the triangle has edges `(v, next)` and
//! `(prev, v)` incident to `v`. `right(c)` is the corner across the first of
//! those edges and `left(c)` the corner across the second. The edge facing `c`
//! itself, from `next(c)` to `prev(c)`, is the one `opposite(c)` crosses.
//!
//! ```text
//!            prev(c)
//!            /    \
//!   left(c) /      \
//!          /        \
//!         c -------- next(c)
//!              right(c)
//! ```

use super::corner_table::CornerTable;
use super::index::{CornerId, MeshIndex, TriangleId, VertexId};

impl<I: MeshIndex> CornerId<I> {
    /// Triangle owning this corner: `c / 3`.
    #[inline]
    pub fn triangle(self) -> TriangleId<I> {
        TriangleId::new(self.index() / 3)
    }

    /// Position of this corner within its triangle (0, 1 or 2).
    #[inline]
    pub fn local(self) -> usize {
        self.index() % 3
    }

    /// Next corner counter-clockwise in the same triangle.
    #[inline]
    pub fn next(self) -> Self {
        let c = self.index();
        Self::new(3 * (c / 3) + (c + 1) % 3)
    }

    /// Previous corner in the same triangle: `next(next(c))`.
    #[inline]
    pub fn prev(self) -> Self {
        let c = self.index();
        Self::new(3 * (c / 3) + (c + 2) % 3)
    }
}

impl<I: MeshIndex> TriangleId<I> {
    /// The `k`-th corner of this triangle (`k` in `0..3`).
    #[inline]
    pub fn corner(self, k: usize) -> CornerId<I> {
        debug_assert!(k < 3);
        CornerId::new(3 * self.index() + k)
    }

    /// The three corners of this triangle.
    #[inline]
    pub fn corners(self) -> [CornerId<I>; 3] {
        [self.corner(0), self.corner(1), self.corner(2)]
    }
}

impl<I: MeshIndex> CornerTable<I> {
    /// Opposite corner, or `c` itself when `c` faces a border edge.
    ///
    /// The self-loop keeps [`left`](Self::left), [`right`](Self::right) and
    /// [`swing`](Self::swing) total. Use [`is_border`](Self::is_border) to detect
    /// borders; never compare the result of this accessor against a sentinel.
    #[inline]
    pub fn opposite(&self, c: CornerId<I>) -> CornerId<I> {
        let o = self.raw_opposite(c);
        if o.is_valid() {
            o
        } else {
            c
        }
    }

    /// Corner across the edge `(prev(c), c)`: `opposite(next(c))`.
    #[inline]
    pub fn left(&self, c: CornerId<I>) -> CornerId<I> {
        self.opposite(c.next())
    }

    /// Corner across the edge `(c, next(c))`: `opposite(prev(c))`.
    #[inline]
    pub fn right(&self, c: CornerId<I>) -> CornerId<I> {
        self.opposite(c.prev())
    }

    /// Next corner of the same vertex in the adjacent triangle: `next(left(c))`.
    ///
    /// When `next(c)` faces a border the result stays in the triangle of `c`
    /// and no longer belongs to the same vertex; [`ring`](Self::ring) stops there.
    #[inline]
    pub fn swing(&self, c: CornerId<I>) -> CornerId<I> {
        self.left(c).next()
    }

    /// Inverse of [`swing`](Self::swing): `prev(right(c))`.
    #[inline]
    pub fn swing_back(&self, c: CornerId<I>) -> CornerId<I> {
        self.right(c).prev()
    }

    /// Iterate over the corners of `vertex(c)` by repeated swinging.
    ///
    /// Yields `c` first. On an interior vertex the iteration ends just before
    /// returning to `c`, after `valence` items. On a border vertex it stops at
    /// the border; start from [`entry_corner`](Self::entry_corner) to see the
    /// whole fan.
    pub fn ring(&self, c: CornerId<I>) -> Ring<'_, I> {
        Ring {
            table: self,
            start: c,
            current: Some(c),
        }
    }

    /// Iterate over the whole fan of corners around `v`.
    pub fn vertex_ring(&self, v: VertexId<I>) -> Ring<'_, I> {
        match self.entry_corner(v) {
            Some(c) => self.ring(c),
            None => Ring {
                table: self,
                start: CornerId::invalid(),
                current: None,
            },
        }
    }

    /// Number of triangles around `v` reached by swinging from its entry corner.
    pub fn swing_valence(&self, v: VertexId<I>) -> usize {
        self.vertex_ring(v).count()
    }

    /// True if some edge incident to `v` is a border edge.
    pub fn is_border_vertex(&self, v: VertexId<I>) -> bool {
        match self.entry_corner(v) {
            Some(c) => self.is_border(c.prev()) || self.ring(c).any(|x| self.is_border(x.next())),
            None => false,
        }
    }
}

/// Iterator over the corners around one vertex, produced by swinging.
pub struct Ring<'a, I: MeshIndex = u32> {
    table: &'a CornerTable<I>,
    start: CornerId<I>,
    current: Option<CornerId<I>>,
}

impl<'a, I: MeshIndex> Iterator for Ring<'a, I> {
    type Item = CornerId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;

        self.current = if self.table.is_border(result.next()) {
            None
        } else {
            let next = self.table.swing(result);
            if next == self.start {
                None
            } else {
                Some(next)
            }
        };

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    #[test]
    fn test_corner_algebra_closure() {
        for i in 0..30 {
            let c: CornerId = CornerId::new(i);
            assert_eq!(c.next().triangle(), c.triangle());
            assert_eq!(c.prev().triangle(), c.triangle());
            assert_eq!(c.next().next().next(), c);
            assert_eq!(c.prev(), c.next().next());
            assert_eq!(c.next().prev(), c);
        }
    }

    #[test]
    fn test_triangle_corners() {
        let t: TriangleId = TriangleId::new(4);
        let [a, b, c] = t.corners();
        assert_eq!((a.index(), b.index(), c.index()), (12, 13, 14));
        assert_eq!(a.local(), 0);
        assert_eq!(c.local(), 2);
        assert_eq!(a.next(), b);
        assert_eq!(c.next(), a);
    }

    #[test]
    fn test_opposite_symmetry_closed() {
        let mesh = fixtures::icosphere(1);
        let table = mesh.table();
        for c in table.corner_ids() {
            assert!(!table.is_border(c));
            assert_eq!(table.opposite(table.opposite(c)), c);
        }
    }

    #[test]
    fn test_border_opposite_is_self() {
        let mesh = fixtures::single_triangle();
        let table = mesh.table();
        for c in table.corner_ids() {
            assert!(table.is_border(c));
            assert_eq!(table.opposite(c), c);
            assert!(!table.raw_opposite(c).is_valid());
        }
        let c0 = CornerId::new(0);
        assert_eq!(table.left(c0), c0.next());
        assert_eq!(table.right(c0), c0.prev());
    }

    #[test]
    fn test_left_right_share_vertex_edges() {
        let mesh = fixtures::octahedron();
        let table = mesh.table();
        for c in table.corner_ids() {
            let v = table.vertex(c);
            // right(c) faces edge (c, next(c)): its neighbours are those two vertices
            let r = table.right(c);
            let r_edge = [table.vertex(r.next()), table.vertex(r.prev())];
            assert!(r_edge.contains(&v));
            assert!(r_edge.contains(&table.vertex(c.next())));
            // left(c) faces edge (prev(c), c)
            let l = table.left(c);
            let l_edge = [table.vertex(l.next()), table.vertex(l.prev())];
            assert!(l_edge.contains(&v));
            assert!(l_edge.contains(&table.vertex(c.prev())));
        }
    }

    #[test]
    fn test_swing_returns_after_valence_steps() {
        let mesh = fixtures::icosphere(1);
        let table = mesh.table();
        for c in table.corner_ids() {
            let v = table.vertex(c);
            let valence = table.vertex_table().iter().filter(|&&x| x == v).count();

            let mut x = c;
            for step in 1..=valence {
                x = table.swing(x);
                assert_eq!(table.vertex(x), v);
                if step < valence {
                    assert_ne!(x, c);
                }
            }
            assert_eq!(x, c);
            assert_eq!(table.swing_back(table.swing(c)), c);
        }
    }

    #[test]
    fn test_ring_on_border_vertex_covers_fan() {
        let mesh = fixtures::hex_fan();
        let table = mesh.table();

        // Centre vertex is interior, rim vertices are on the border.
        let centre = VertexId::new(6);
        assert_eq!(table.swing_valence(centre), 6);
        assert!(!table.is_border_vertex(centre));

        for i in 0..6 {
            let rim = VertexId::new(i);
            assert_eq!(table.swing_valence(rim), 2);
            assert!(table.is_border_vertex(rim));
        }
    }
}
