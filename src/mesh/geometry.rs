//! Vertex position storage.
//!
//! [`Geometry`] owns one position per vertex, addressed by dense [`VertexId`]s.
//! New vertices are appended at the next free id; ids are never reused until an
//! explicit [`Geometry::compact`] pass.

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Dense array of vertex positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    positions: Vec<Point3<f64>>,
}

impl Geometry {
    /// Create an empty geometry store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
        }
    }

    /// Wrap an existing position list. Vertex `i` is `positions[i]`.
    pub fn from_positions(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    /// Number of stored vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Check if the store holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a vertex.
    ///
    /// # Panics
    /// Panics if `v` is out of range; see [`Geometry::try_position`].
    #[inline]
    pub fn position<I: MeshIndex>(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// Position of a vertex, or [`MeshError::VertexOutOfRange`].
    pub fn try_position<I: MeshIndex>(&self, v: VertexId<I>) -> Result<&Point3<f64>> {
        self.positions
            .get(v.index())
            .ok_or(MeshError::VertexOutOfRange {
                vertex: v.index(),
                num_vertices: self.positions.len(),
            })
    }

    /// Overwrite the position of an existing vertex.
    pub fn set_position<I: MeshIndex>(&mut self, v: VertexId<I>, position: Point3<f64>) -> Result<()> {
        let num_vertices = self.positions.len();
        let slot = self
            .positions
            .get_mut(v.index())
            .ok_or(MeshError::VertexOutOfRange {
                vertex: v.index(),
                num_vertices,
            })?;
        *slot = position;
        Ok(())
    }

    /// Append a vertex and return its id.
    pub fn add_vertex<I: MeshIndex>(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        id
    }

    /// All positions, indexed by vertex id.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Consume the store and return its positions.
    pub fn into_positions(self) -> Vec<Point3<f64>> {
        self.positions
    }

    /// Axis-aligned bounding box, or `None` for an empty store.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Keep only the vertices for which `keep` is true, preserving their order.
    ///
    /// Returns the old-to-new remap table, with `None` for dropped vertices.
    pub fn compact<I: MeshIndex>(&mut self, keep: &[bool]) -> Vec<Option<VertexId<I>>> {
        debug_assert_eq!(keep.len(), self.positions.len());

        let mut remap = Vec::with_capacity(self.positions.len());
        let mut next = 0;
        for (old, &kept) in keep.iter().enumerate() {
            if kept {
                self.positions.swap(next, old);
                remap.push(Some(VertexId::new(next)));
                next += 1;
            } else {
                remap.push(None);
            }
        }
        self.positions.truncate(next);
        remap
    }
}
