//! Triangle mesh with corner-table connectivity.

use nalgebra::{Point3, Vector3};

use super::builder::{build_corner_table, BuildOptions};
use super::corner_table::CornerTable;
use super::geometry::Geometry;
use super::index::{CornerId, MeshIndex, TriangleId, VertexId};
use crate::error::{MeshError, Result};

/// A triangle mesh: positions, corner table, and per-triangle visibility.
///
/// Hidden triangles stay in the table, so corner and triangle ids remain
/// stable, until [`CornerMesh::compact`] removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerMesh<I: MeshIndex = u32> {
    geometry: Geometry,
    table: CornerTable<I>,
    visible: Vec<bool>,
}

impl<I: MeshIndex> CornerMesh<I> {
    /// Combine a geometry store and a corner table.
    ///
    /// Every vertex referenced by the table must have a position.
    pub fn from_parts(geometry: Geometry, mut table: CornerTable<I>) -> Result<Self> {
        let num_vertices = geometry.num_vertices();
        if let Some(v) = table.vertex_table().iter().find(|v| v.index() >= num_vertices) {
            return Err(MeshError::VertexOutOfRange {
                vertex: v.index(),
                num_vertices,
            });
        }
        if table.num_vertices() != num_vertices {
            table.refresh_entry_corners(num_vertices);
        }

        let visible = vec![true; table.num_triangles()];
        Ok(Self {
            geometry,
            table,
            visible,
        })
    }

    /// Split the mesh into its geometry and connectivity.
    pub fn into_parts(self) -> (Geometry, CornerTable<I>) {
        (self.geometry, self.table)
    }

    // ==================== Accessors ====================

    /// The vertex positions.
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The corner table.
    #[inline]
    pub fn table(&self) -> &CornerTable<I> {
        &self.table
    }

    /// Number of vertices in the geometry store.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.geometry.num_vertices()
    }

    /// Number of triangles, hidden ones included.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.table.num_triangles()
    }

    /// Number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.table.num_corners()
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        self.geometry.position(v)
    }

    /// Position of the vertex of a corner.
    #[inline]
    pub fn corner_position(&self, c: CornerId<I>) -> &Point3<f64> {
        self.geometry.position(self.table.vertex(c))
    }

    /// Move a vertex.
    pub fn set_position(&mut self, v: VertexId<I>, position: Point3<f64>) -> Result<()> {
        self.geometry.set_position(v, position)
    }

    // ==================== Visibility ====================

    /// Check if a triangle is visible.
    #[inline]
    pub fn is_visible(&self, t: TriangleId<I>) -> bool {
        self.visible[t.index()]
    }

    /// Hide a triangle. It is removed by the next [`CornerMesh::compact`].
    pub fn hide(&mut self, t: TriangleId<I>) {
        self.visible[t.index()] = false;
    }

    /// Make a hidden triangle visible again.
    pub fn show(&mut self, t: TriangleId<I>) {
        self.visible[t.index()] = true;
    }

    /// Number of visible triangles.
    pub fn num_visible_triangles(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    // ==================== Geometry ====================

    /// Positions of the three corners of a triangle.
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        let [a, b, c] = self.table.triangle_vertices(t);
        [
            *self.geometry.position(a),
            *self.geometry.position(b),
            *self.geometry.position(c),
        ]
    }

    /// Cross product of the two edges leaving corner 0; its length is twice the area.
    pub fn triangle_normal(&self, t: TriangleId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Area of a triangle.
    pub fn triangle_area(&self, t: TriangleId<I>) -> f64 {
        0.5 * self.triangle_normal(t).norm()
    }

    /// Centroid of a triangle.
    pub fn triangle_centroid(&self, t: TriangleId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Total area of the visible triangles.
    pub fn surface_area(&self) -> f64 {
        self.table
            .triangle_ids()
            .filter(|&t| self.is_visible(t))
            .map(|t| self.triangle_area(t))
            .sum()
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.geometry.bounding_box()
    }

    // ==================== Topology ====================

    /// Number of undirected edges: interior edges are seen from two corners.
    pub fn num_edges(&self) -> usize {
        let border = self.table.border_corners().count();
        (self.table.num_corners() + border) / 2
    }

    /// Number of vertices referenced by at least one triangle.
    pub fn num_referenced_vertices(&self) -> usize {
        (0..self.table.num_vertices())
            .filter(|&v| self.table.entry_corner(VertexId::new(v)).is_some())
            .count()
    }

    /// V - E + F over referenced vertices; 2 for a sphere, 1 for a disk.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_referenced_vertices() as i64 - self.num_edges() as i64
            + self.num_triangles() as i64
    }

    // ==================== Mutation ====================

    /// Append a vertex to the geometry store.
    pub(crate) fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        self.geometry.add_vertex(position)
    }

    /// Append a visible triangle whose corners are all on the border.
    pub(crate) fn push_triangle(&mut self, vertices: [VertexId<I>; 3]) -> TriangleId<I> {
        self.visible.push(true);
        self.table.push_triangle(vertices)
    }

    /// Recompute the opposite table from the vertex table.
    pub(crate) fn rebuild_opposites(&mut self, options: &BuildOptions) -> Result<()> {
        self.table = build_corner_table(
            self.table.vertex_table().to_vec(),
            self.geometry.num_vertices(),
            options,
        )?;
        Ok(())
    }

    /// Remove hidden triangles and unreferenced vertices.
    ///
    /// Surviving triangles and vertices keep their relative order and are
    /// renumbered densely. Corners whose opposite triangle was removed become
    /// border corners. Returns the old-to-new vertex map.
    pub fn compact(&mut self) -> Vec<Option<VertexId<I>>> {
        let num_triangles = self.table.num_triangles();

        let mut triangle_map = vec![usize::MAX; num_triangles];
        let mut kept = 0;
        for (t, &visible) in self.visible.iter().enumerate() {
            if visible {
                triangle_map[t] = kept;
                kept += 1;
            }
        }

        let mut vertices = Vec::with_capacity(3 * kept);
        let mut opposites = Vec::with_capacity(3 * kept);
        for c in self.table.corner_ids() {
            if !self.visible[c.triangle().index()] {
                continue;
            }
            vertices.push(self.table.vertex(c));

            let o = self.table.raw_opposite(c);
            let mapped = if o.is_valid() && self.visible[o.triangle().index()] {
                CornerId::new(3 * triangle_map[o.triangle().index()] + o.local())
            } else {
                CornerId::invalid()
            };
            opposites.push(mapped);
        }

        let mut referenced = vec![false; self.geometry.num_vertices()];
        for v in &vertices {
            referenced[v.index()] = true;
        }
        let vertex_map: Vec<Option<VertexId<I>>> = self.geometry.compact(&referenced);
        for v in &mut vertices {
            if let Some(new) = vertex_map[v.index()] {
                *v = new;
            }
        }

        log::debug!(
            "compacted mesh: {} -> {} triangles, {} -> {} vertices",
            num_triangles,
            kept,
            referenced.len(),
            self.geometry.num_vertices()
        );

        self.table = CornerTable {
            vertices,
            opposites,
            entry_corners: Vec::new(),
        };
        self.table.refresh_entry_corners(self.geometry.num_vertices());
        self.visible = vec![true; kept];

        vertex_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_geometry() {
        let mesh = fixtures::single_triangle();
        let t = TriangleId::new(0);

        assert_relative_eq!(mesh.triangle_area(t), 0.5);
        assert_relative_eq!(mesh.triangle_normal(t), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(
            mesh.triangle_centroid(t),
            Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)
        );
    }

    #[test]
    fn test_euler_characteristic() {
        assert_eq!(fixtures::tetrahedron().euler_characteristic(), 2);
        assert_eq!(fixtures::icosphere(2).euler_characteristic(), 2);
        assert_eq!(fixtures::hex_fan().euler_characteristic(), 1);
        assert_eq!(fixtures::grid(3, 2).euler_characteristic(), 1);
        assert_eq!(fixtures::torus(6, 4).euler_characteristic(), 0);
    }

    #[test]
    fn test_edge_count() {
        let mesh = fixtures::octahedron();
        assert_eq!(mesh.num_edges(), 12);

        let quad = fixtures::two_triangles();
        assert_eq!(quad.num_edges(), 5);
    }

    #[test]
    fn test_compact_removes_hidden_triangles() {
        let mut mesh = fixtures::hex_fan();
        mesh.hide(TriangleId::new(0));
        assert_eq!(mesh.num_visible_triangles(), 5);

        let remap = mesh.compact();

        assert_eq!(mesh.num_triangles(), 5);
        assert_eq!(mesh.num_vertices(), 7);
        assert!(remap.iter().all(|v| v.is_some()));
        assert!(mesh.table().is_valid());
        // The fan is now open between the two rims of the removed triangle.
        assert_eq!(mesh.table().border_corners().count(), 7);
    }

    #[test]
    fn test_compact_drops_unreferenced_vertices() {
        let mut mesh = fixtures::two_triangles();
        mesh.hide(TriangleId::new(1));
        let remap = mesh.compact();

        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(remap[3], None);
        assert_eq!(remap[2], Some(VertexId::new(2)));
        assert!(mesh.table().is_valid());
        assert!(mesh.table().border_corners().count() == 3);
    }

    #[test]
    fn test_from_parts_rejects_missing_positions() {
        let mesh = fixtures::tetrahedron();
        let (_, table) = mesh.into_parts();
        let geometry = Geometry::from_positions(vec![Point3::origin(); 3]);
        assert!(matches!(
            CornerMesh::from_parts(geometry, table),
            Err(MeshError::VertexOutOfRange { vertex: 3, .. })
        ));
    }
}
