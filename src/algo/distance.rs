//! Combinatorial distances between triangles.
//!
//! Two measures are provided:
//!
//! - [`ring_distances`]: a flood fill alternating between triangles and
//!   vertices. The seed triangle is ring 1, its vertices get ring 1, every
//!   unreached triangle touching a ring-`r` vertex gets ring `r + 1`, and so on.
//! - [`triangle_path`]: a shortest path between two triangles, stepping only
//!   across shared edges.

use std::collections::VecDeque;

use crate::error::Result;
use crate::mesh::{CornerId, CornerTable, MeshIndex, TriangleId, VertexId};

/// Options for the ring flood fill.
#[derive(Debug, Clone, Default)]
pub struct DistanceOptions {
    /// Stop after assigning this many vertex rings. `None` floods the whole component.
    pub max_rings: Option<u32>,
}

impl DistanceOptions {
    /// Limit the number of vertex rings.
    pub fn with_max_rings(mut self, max_rings: u32) -> Self {
        self.max_rings = Some(max_rings);
        self
    }
}

/// Ring numbers of a flood fill; 0 means unreached.
#[derive(Debug, Clone)]
pub struct RingDistances<I: MeshIndex = u32> {
    triangle_rings: Vec<u32>,
    vertex_rings: Vec<u32>,
    seed: TriangleId<I>,
}

impl<I: MeshIndex> RingDistances<I> {
    /// The seed triangle.
    pub fn seed(&self) -> TriangleId<I> {
        self.seed
    }

    /// Ring of a triangle, or `None` if the fill did not reach it.
    pub fn triangle_ring(&self, t: TriangleId<I>) -> Option<u32> {
        match self.triangle_rings[t.index()] {
            0 => None,
            r => Some(r),
        }
    }

    /// Ring of a vertex, or `None` if the fill did not reach it.
    pub fn vertex_ring(&self, v: VertexId<I>) -> Option<u32> {
        match self.vertex_rings.get(v.index()).copied().unwrap_or(0) {
            0 => None,
            r => Some(r),
        }
    }

    /// Raw per-triangle ring numbers.
    pub fn triangle_rings(&self) -> &[u32] {
        &self.triangle_rings
    }

    /// Raw per-vertex ring numbers.
    pub fn vertex_rings(&self) -> &[u32] {
        &self.vertex_rings
    }

    /// Largest triangle ring assigned.
    pub fn max_ring(&self) -> u32 {
        self.triangle_rings.iter().copied().max().unwrap_or(0)
    }

    /// Triangles reached by the fill.
    pub fn reached_triangles(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        self.triangle_rings
            .iter()
            .enumerate()
            .filter(|(_, &r)| r > 0)
            .map(|(t, _)| TriangleId::new(t))
    }
}

/// Flood ring numbers outward from `seed`.
pub fn ring_distances<I: MeshIndex>(
    table: &CornerTable<I>,
    seed: TriangleId<I>,
    options: &DistanceOptions,
) -> Result<RingDistances<I>> {
    table.check_corner(seed.corner(0))?;

    let mut triangle_rings = vec![0u32; table.num_triangles()];
    let mut vertex_rings = vec![0u32; table.num_vertices()];

    // Corners grouped by vertex, so every fan of a vertex is flooded.
    let mut offsets = vec![0usize; table.num_vertices() + 1];
    for v in table.vertex_table() {
        offsets[v.index() + 1] += 1;
    }
    for i in 1..offsets.len() {
        offsets[i] += offsets[i - 1];
    }
    let mut fill = offsets.clone();
    let mut corners = vec![CornerId::<I>::invalid(); table.num_corners()];
    for c in table.corner_ids() {
        let v = table.vertex(c).index();
        corners[fill[v]] = c;
        fill[v] += 1;
    }

    triangle_rings[seed.index()] = 1;
    let mut frontier = vec![seed];
    let mut r = 1u32;

    while !frontier.is_empty() && options.max_rings.map_or(true, |max| r <= max) {
        let mut next = Vec::new();

        for t in frontier {
            for v in table.triangle_vertices(t) {
                if vertex_rings[v.index()] != 0 {
                    continue;
                }
                vertex_rings[v.index()] = r;

                for c in &corners[offsets[v.index()]..offsets[v.index() + 1]] {
                    let u = c.triangle();
                    if triangle_rings[u.index()] == 0 {
                        triangle_rings[u.index()] = r + 1;
                        next.push(u);
                    }
                }
            }
        }

        frontier = next;
        r += 1;
    }

    Ok(RingDistances {
        triangle_rings,
        vertex_rings,
        seed,
    })
}

/// Shortest edge-adjacent path from `from` to `to`, both included.
///
/// Returns `None` when `to` is not reachable across shared edges.
pub fn triangle_path<I: MeshIndex>(
    table: &CornerTable<I>,
    from: TriangleId<I>,
    to: TriangleId<I>,
) -> Result<Option<Vec<TriangleId<I>>>> {
    table.check_corner(from.corner(0))?;
    table.check_corner(to.corner(0))?;

    let mut parent = vec![TriangleId::<I>::invalid(); table.num_triangles()];
    parent[from.index()] = from;

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(t) = queue.pop_front() {
        if t == to {
            break;
        }
        for c in t.corners() {
            if table.is_border(c) {
                continue;
            }
            let u = table.raw_opposite(c).triangle();
            if !parent[u.index()].is_valid() {
                parent[u.index()] = t;
                queue.push_back(u);
            }
        }
    }

    if !parent[to.index()].is_valid() {
        return Ok(None);
    }

    let mut path = vec![to];
    let mut t = to;
    while t != from {
        t = parent[t.index()];
        path.push(t);
    }
    path.reverse();
    Ok(Some(path))
}
