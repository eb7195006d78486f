//! Border loops and hole filling.
//!
//! A border loop is the cyclic sequence of border corners around one hole. The
//! loop is walked by stepping to `next(c)` and swinging across interior edges
//! until the next border corner is found.
//!
//! [`fill_holes`] closes every loop with a fan of triangles around one new
//! vertex. The codec uses it to turn a mesh with boundaries into a closed one.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{BuildOptions, CornerId, CornerMesh, CornerTable, Marks, MeshIndex, VertexId};

/// Border corners of one hole, in walking order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderLoop<I: MeshIndex = u32> {
    /// Corners facing the border edges of the loop.
    pub corners: Vec<CornerId<I>>,
}

impl<I: MeshIndex> BorderLoop<I> {
    /// Number of border edges in the loop.
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Check if the loop has no edges.
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }
}

/// The border corner that follows `c` on its loop, found by turning around `V[prev(c)]`.
fn next_border_corner<I: MeshIndex>(table: &CornerTable<I>, c: CornerId<I>) -> Result<CornerId<I>> {
    let mut b = c.next();
    let mut steps = 0;
    while !table.is_border(b) {
        b = table.raw_opposite(b).next();
        steps += 1;
        if steps > table.num_corners() {
            return Err(MeshError::NonManifoldVertex {
                vertex: table.vertex(c.prev()).index(),
            });
        }
    }
    Ok(b)
}

/// Enumerate the border loops of a table.
///
/// Returns [`MeshError::NonManifoldVertex`] when a walk runs into a loop it did
/// not start on, which happens when a vertex joins two separate fans.
pub fn border_loops<I: MeshIndex>(table: &CornerTable<I>) -> Result<Vec<BorderLoop<I>>> {
    let mut seen = Marks::new(table.num_corners());
    let mut loops = Vec::new();

    for start in table.border_corners() {
        if seen.is_marked(start.index()) {
            continue;
        }

        let mut corners = Vec::new();
        let mut c = start;
        loop {
            if !seen.mark(c.index()) {
                return Err(MeshError::NonManifoldVertex {
                    vertex: table.vertex(c.prev()).index(),
                });
            }
            corners.push(c);
            c = next_border_corner(table, c)?;
            if c == start {
                break;
            }
        }

        loops.push(BorderLoop { corners });
    }

    Ok(loops)
}

/// Predicted position of the fan tip closing a loop.
///
/// Each border edge predicts a point halfway between its midpoint and the
/// parallelogram completion of its triangle; the tip is the average.
fn hole_tip<I: MeshIndex>(mesh: &CornerMesh<I>, border: &BorderLoop<I>) -> Point3<f64> {
    let mut sum = nalgebra::Vector3::zeros();
    for &c in &border.corners {
        let apex = mesh.corner_position(c).coords;
        let a = mesh.corner_position(c.next()).coords;
        let b = mesh.corner_position(c.prev()).coords;
        let mid = (a + b) * 0.5;
        let parallelogram = a + b - apex;
        sum += (mid + parallelogram) * 0.5;
    }
    Point3::from(sum / border.corners.len() as f64)
}

/// Close every hole with a triangle fan around a new vertex.
///
/// Fan triangles are appended after the existing ones, one per border corner
/// `c`, as `[tip, V[prev(c)], V[next(c)]]`, and new vertices after the existing
/// vertices. The opposite table is rebuilt. Returns the tip of each loop.
pub fn fill_holes<I: MeshIndex>(mesh: &mut CornerMesh<I>) -> Result<Vec<VertexId<I>>> {
    let loops = border_loops(mesh.table())?;
    if loops.is_empty() {
        return Ok(Vec::new());
    }

    let mut tips = Vec::with_capacity(loops.len());
    for border in &loops {
        let position = hole_tip(mesh, border);
        let tip = mesh.add_vertex(position);

        for &c in &border.corners {
            let a = mesh.table().vertex(c.prev());
            let b = mesh.table().vertex(c.next());
            mesh.push_triangle([tip, a, b]);
        }
        tips.push(tip);
    }

    mesh.rebuild_opposites(&BuildOptions::default())?;

    log::debug!(
        "filled {} hole(s) with {} fan triangles",
        loops.len(),
        loops.iter().map(BorderLoop::len).sum::<usize>()
    );

    Ok(tips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_mesh_has_no_loops() {
        let mesh = fixtures::icosphere(1);
        assert!(border_loops(mesh.table()).unwrap().is_empty());
    }

    #[test]
    fn test_single_triangle_loop() {
        let mesh = fixtures::single_triangle();
        let loops = border_loops(mesh.table()).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);
    }

    #[test]
    fn test_grid_loop_length() {
        let mesh = fixtures::grid(4, 3);
        let loops = border_loops(mesh.table()).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 2 * (4 + 3));

        // Consecutive border edges share an endpoint.
        let table = mesh.table();
        let corners = &loops[0].corners;
        for (i, &c) in corners.iter().enumerate() {
            let d = corners[(i + 1) % corners.len()];
            let ends = [table.vertex(d.next()), table.vertex(d.prev())];
            assert!(ends.contains(&table.vertex(c.next())) || ends.contains(&table.vertex(c.prev())));
        }
    }

    #[test]
    fn test_fill_hex_fan() {
        let mut mesh = fixtures::hex_fan();
        let tips = fill_holes(&mut mesh).unwrap();

        assert_eq!(tips, vec![VertexId::new(7)]);
        assert_eq!(mesh.num_triangles(), 12);
        assert!(mesh.table().is_closed());
        assert!(mesh.table().is_valid());
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_relative_eq!(*mesh.position(tips[0]), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_fill_single_triangle() {
        let mut mesh = fixtures::single_triangle();
        fill_holes(&mut mesh).unwrap();

        assert_eq!(mesh.num_triangles(), 4);
        assert_eq!(mesh.num_vertices(), 4);
        assert!(mesh.table().is_closed());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_fill_is_noop_when_closed() {
        let mut mesh = fixtures::tetrahedron();
        let before = mesh.clone();
        assert!(fill_holes(&mut mesh).unwrap().is_empty());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_bowtie_loops_stay_separate() {
        // Two triangles touching only at vertex 0.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let mesh: CornerMesh =
            crate::mesh::build_from_triangles(&positions, &[[0, 1, 2], [0, 3, 4]]).unwrap();
        // Each triangle is its own loop; the walk never crosses the shared vertex.
        assert_eq!(border_loops(mesh.table()).unwrap().len(), 2);
    }
}
