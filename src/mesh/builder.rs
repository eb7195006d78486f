//! Connectivity construction.
//!
//! A mesh file supplies only the vertex of each corner. This module derives the
//! opposite array from that vertex table and packages the result, together with
//! the positions, as a [`CornerMesh`].
//!
//! Two strategies are provided:
//!
//! - [`BuildStrategy::Naive`] compares every pair of corners. It is quadratic
//!   and serves as a reference for the bucketed builder.
//! - [`BuildStrategy::Bucketed`] groups corners by vertex with a counting sort
//!   and compares only corners that share a vertex.
//!
//! # Non-manifold input
//!
//! When a third corner claims an edge that already has a pairing, the behaviour
//! depends on [`NonManifoldPolicy`]: `Reject` returns
//! [`MeshError::NonManifoldEdge`], `FirstWins` keeps the pairing found first and
//! leaves the later claimant on the border. "First" means the order in which
//! the strategy visits candidate pairs: `(i, j)` ascending for the naive
//! builder; vertex id ascending, then position in the bucket, for the bucketed
//! one.

use nalgebra::Point3;

use super::corner_mesh::CornerMesh;
use super::corner_table::CornerTable;
use super::geometry::Geometry;
use super::index::{CornerId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Algorithm used to pair opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStrategy {
    /// Test all corner pairs. O(corners²).
    Naive,
    /// Test pairs within per-vertex buckets. O(corners · valence).
    #[default]
    Bucketed,
}

/// What to do when more than two corners claim one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldPolicy {
    /// Fail with [`MeshError::NonManifoldEdge`].
    #[default]
    Reject,
    /// Keep the first pairing found and leave later claimants as border.
    FirstWins,
}

/// Options for connectivity construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Pairing algorithm.
    pub strategy: BuildStrategy,

    /// Handling of edges shared by more than two triangles.
    pub non_manifold: NonManifoldPolicy,
}

impl BuildOptions {
    /// Create options with the default bucketed strategy and `Reject` policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pairing algorithm.
    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the non-manifold policy.
    pub fn with_non_manifold(mut self, policy: NonManifoldPolicy) -> Self {
        self.non_manifold = policy;
        self
    }
}

/// Opposite array under construction, with conflict bookkeeping.
struct Pairing<'a, I: MeshIndex> {
    vertices: &'a [VertexId<I>],
    opposites: Vec<CornerId<I>>,
    policy: NonManifoldPolicy,
    conflicts: usize,
}

impl<'a, I: MeshIndex> Pairing<'a, I> {
    fn new(vertices: &'a [VertexId<I>], policy: NonManifoldPolicy) -> Self {
        Self {
            vertices,
            opposites: vec![CornerId::invalid(); vertices.len()],
            policy,
            conflicts: 0,
        }
    }

    /// Make `a` and `b` opposite unless one of them is already paired elsewhere.
    fn pair(&mut self, a: CornerId<I>, b: CornerId<I>) -> Result<()> {
        let oa = self.opposites[a.index()];
        let ob = self.opposites[b.index()];

        if oa == b && ob == a {
            return Ok(());
        }
        if !oa.is_valid() && !ob.is_valid() {
            self.opposites[a.index()] = b;
            self.opposites[b.index()] = a;
            return Ok(());
        }

        match self.policy {
            NonManifoldPolicy::Reject => Err(MeshError::NonManifoldEdge {
                v0: self.vertices[a.next().index()].index(),
                v1: self.vertices[a.prev().index()].index(),
            }),
            NonManifoldPolicy::FirstWins => {
                self.conflicts += 1;
                Ok(())
            }
        }
    }

    fn finish(self) -> Vec<CornerId<I>> {
        if self.conflicts > 0 {
            log::warn!(
                "{} non-manifold edge claim(s) left on the border (first pairing kept)",
                self.conflicts
            );
        }
        self.opposites
    }
}

/// Pair opposite corners by testing every pair `(i, j)`, `i < j`.
///
/// Returns the raw opposite array, with `CornerId::invalid()` on border corners.
pub fn build_opposites_naive<I: MeshIndex>(
    vertices: &[VertexId<I>],
    policy: NonManifoldPolicy,
) -> Result<Vec<CornerId<I>>> {
    let v = |c: CornerId<I>| vertices[c.index()];
    let mut pairing = Pairing::new(vertices, policy);

    for i in 0..vertices.len() {
        let ci = CornerId::<I>::new(i);
        for j in (i + 1)..vertices.len() {
            let cj = CornerId::<I>::new(j);
            if v(ci.next()) == v(cj.prev()) && v(ci.prev()) == v(cj.next()) {
                pairing.pair(ci, cj)?;
            }
        }
    }

    Ok(pairing.finish())
}

/// Pair opposite corners using per-vertex corner buckets.
///
/// Corners are grouped by vertex with a counting sort: per-vertex counts become
/// bucket offsets and a second pass scatters the corners. Within the bucket of
/// vertex `v`, two corners `a` and `b` share the edge `(v, w)` when
/// `V[next(a)] == V[prev(b)]`; the corners facing that edge are `prev(a)` and
/// `next(b)`. Each edge is handled from the bucket of its smaller endpoint.
pub fn build_opposites_bucketed<I: MeshIndex>(
    vertices: &[VertexId<I>],
    num_vertices: usize,
    policy: NonManifoldPolicy,
) -> Result<Vec<CornerId<I>>> {
    let v = |c: CornerId<I>| vertices[c.index()];

    // Counting sort of corners by vertex
    let mut offsets = vec![0usize; num_vertices + 1];
    for vertex in vertices {
        offsets[vertex.index() + 1] += 1;
    }
    for i in 0..num_vertices {
        offsets[i + 1] += offsets[i];
    }

    let mut fill = offsets.clone();
    let mut buckets = vec![CornerId::<I>::invalid(); vertices.len()];
    for (c, vertex) in vertices.iter().enumerate() {
        let slot = &mut fill[vertex.index()];
        buckets[*slot] = CornerId::new(c);
        *slot += 1;
    }

    let mut pairing = Pairing::new(vertices, policy);
    let mut max_bucket = 0;

    for vi in 0..num_vertices {
        let bucket = &buckets[offsets[vi]..offsets[vi + 1]];
        max_bucket = max_bucket.max(bucket.len());

        for (k, &a) in bucket.iter().enumerate() {
            for &b in &bucket[k + 1..] {
                let (an, ap) = (v(a.next()), v(a.prev()));
                let (bn, bp) = (v(b.next()), v(b.prev()));

                if an == bp && vi < an.index() {
                    pairing.pair(a.prev(), b.next())?;
                }
                if bn == ap && vi < bn.index() {
                    pairing.pair(b.prev(), a.next())?;
                }
            }
        }
    }

    log::debug!(
        "bucketed builder: {} corners in {} buckets, largest bucket {}",
        vertices.len(),
        num_vertices,
        max_bucket
    );

    Ok(pairing.finish())
}

/// Build a corner table from a vertex-per-corner array.
///
/// Checks that the table has a multiple of three corners, that every vertex id
/// is below `num_vertices`, and that no triangle repeats a vertex.
pub fn build_corner_table<I: MeshIndex>(
    vertices: Vec<VertexId<I>>,
    num_vertices: usize,
    options: &BuildOptions,
) -> Result<CornerTable<I>> {
    if vertices.len() % 3 != 0 {
        return Err(MeshError::CornerCountMismatch {
            num_corners: vertices.len(),
        });
    }
    for (t, tri) in vertices.chunks_exact(3).enumerate() {
        for v in tri {
            if !v.is_valid() || v.index() >= num_vertices {
                return Err(MeshError::InvalidVertexIndex {
                    triangle: t,
                    vertex: v.index(),
                });
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(MeshError::DegenerateTriangle { triangle: t });
        }
    }

    let opposites = match options.strategy {
        BuildStrategy::Naive => build_opposites_naive(&vertices, options.non_manifold)?,
        BuildStrategy::Bucketed => {
            build_opposites_bucketed(&vertices, num_vertices, options.non_manifold)?
        }
    };

    let mut table = CornerTable {
        vertices,
        opposites,
        entry_corners: Vec::new(),
    };
    table.refresh_entry_corners(num_vertices);
    Ok(table)
}

/// Build a corner mesh from vertex positions and triangles.
///
/// Uses the default [`BuildOptions`]: bucketed pairing, non-manifold edges rejected.
///
/// # Example
/// ```
/// use clers::mesh::{build_from_triangles, CornerMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let triangles = vec![[0, 1, 2], [0, 2, 3]];
///
/// let mesh: CornerMesh = build_from_triangles(&positions, &triangles).unwrap();
/// assert_eq!(mesh.num_triangles(), 2);
/// assert_eq!(mesh.table().border_corners().count(), 4);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    positions: &[Point3<f64>],
    triangles: &[[usize; 3]],
) -> Result<CornerMesh<I>> {
    build_from_triangles_with_options(positions, triangles, &BuildOptions::default())
}

/// Build a corner mesh with explicit [`BuildOptions`].
pub fn build_from_triangles_with_options<I: MeshIndex>(
    positions: &[Point3<f64>],
    triangles: &[[usize; 3]],
    options: &BuildOptions,
) -> Result<CornerMesh<I>> {
    if triangles.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let vertices: Vec<VertexId<I>> = triangles
        .iter()
        .enumerate()
        .flat_map(|(t, tri)| tri.iter().map(move |&v| (t, v)))
        .map(|(t, v)| {
            if v >= positions.len() {
                Err(MeshError::InvalidVertexIndex { triangle: t, vertex: v })
            } else {
                Ok(VertexId::new(v))
            }
        })
        .collect::<Result<_>>()?;

    let table = build_corner_table(vertices, positions.len(), options)?;
    CornerMesh::from_parts(Geometry::from_positions(positions.to_vec()), table)
}

/// Convert a corner mesh back to positions and visible triangles.
pub fn to_face_vertex<I: MeshIndex>(mesh: &CornerMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let positions = mesh.geometry().positions().to_vec();

    let triangles = mesh
        .table()
        .triangle_ids()
        .filter(|&t| mesh.is_visible(t))
        .map(|t| {
            let [a, b, c] = mesh.table().triangle_vertices(t);
            [a.index(), b.index(), c.index()]
        })
        .collect();

    (positions, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    fn quad() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        (positions, vec![[0, 1, 2], [0, 2, 3]])
    }

    /// Three triangles on the edge (0, 1).
    fn book() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        (positions, vec![[0, 1, 2], [1, 0, 3], [1, 0, 4]])
    }

    fn both_strategies() -> [BuildOptions; 2] {
        [
            BuildOptions::new().with_strategy(BuildStrategy::Naive),
            BuildOptions::new().with_strategy(BuildStrategy::Bucketed),
        ]
    }

    #[test]
    fn test_single_triangle() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh: CornerMesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.table().border_corners().count(), 3);
        assert!(mesh.table().is_valid());
    }

    #[test]
    fn test_quad_shares_one_edge() {
        let (positions, triangles) = quad();
        for options in both_strategies() {
            let mesh: CornerMesh =
                build_from_triangles_with_options(&positions, &triangles, &options).unwrap();
            let table = mesh.table();

            // Corner 1 (vertex 1) faces edge (2, 0); corner 5 (vertex 3) faces edge (0, 2).
            assert_eq!(table.raw_opposite(CornerId::new(1)), CornerId::new(5));
            assert_eq!(table.raw_opposite(CornerId::new(5)), CornerId::new(1));

            let border: Vec<usize> = table.border_corners().map(|c| c.index()).collect();
            assert_eq!(border, vec![0, 2, 3, 4]);
        }
    }

    #[test]
    fn test_strategies_agree() {
        for mesh in [
            fixtures::tetrahedron(),
            fixtures::icosphere(2),
            fixtures::grid(5, 4),
            fixtures::hex_fan(),
            fixtures::flipped_icosphere(1, 40, 7),
        ] {
            let vertices = mesh.table().vertex_table().to_vec();
            let n = mesh.num_vertices();
            let naive = build_opposites_naive(&vertices, NonManifoldPolicy::Reject).unwrap();
            let bucketed =
                build_opposites_bucketed(&vertices, n, NonManifoldPolicy::Reject).unwrap();
            assert_eq!(naive, bucketed);
            assert_eq!(naive, mesh.table().opposite_table());
        }
    }

    #[test]
    fn test_closed_mesh_has_no_border() {
        let mesh = fixtures::octahedron();
        assert!(mesh.table().is_closed());
        assert!(mesh.table().is_valid());
    }

    #[test]
    fn test_non_manifold_rejected() {
        let (positions, triangles) = book();
        for options in both_strategies() {
            let err = build_from_triangles_with_options::<u32>(&positions, &triangles, &options)
                .unwrap_err();
            match err {
                MeshError::NonManifoldEdge { v0, v1 } => {
                    let mut edge = [v0, v1];
                    edge.sort();
                    assert_eq!(edge, [0, 1]);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_manifold_first_wins() {
        let (positions, triangles) = book();
        for options in both_strategies() {
            let options = options.with_non_manifold(NonManifoldPolicy::FirstWins);
            let mesh: CornerMesh =
                build_from_triangles_with_options(&positions, &triangles, &options).unwrap();
            let table = mesh.table();

            // Corner 2 faces (0, 1); corners 5 and 8 face (1, 0). Corner 5 is found first.
            assert_eq!(table.raw_opposite(CornerId::new(2)), CornerId::new(5));
            assert_eq!(table.raw_opposite(CornerId::new(5)), CornerId::new(2));
            assert!(table.is_border(CornerId::new(8)));
            assert!(table.is_valid());
        }
    }

    #[test]
    fn test_invalid_vertex_index() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let result = build_from_triangles::<u32>(&positions, &[[0, 1, 5]]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { triangle: 0, vertex: 5 })
        ));
    }

    #[test]
    fn test_degenerate_triangle() {
        let (positions, _) = quad();
        let result = build_from_triangles::<u32>(&positions, &[[0, 1, 2], [3, 3, 1]]);
        assert!(matches!(result, Err(MeshError::DegenerateTriangle { triangle: 1 })));
    }

    #[test]
    fn test_empty_input() {
        let result = build_from_triangles::<u32>(&[], &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_corner_count_mismatch() {
        let vertices: Vec<VertexId> = (0..4).map(VertexId::new).collect();
        let result = build_corner_table(vertices, 4, &BuildOptions::default());
        assert!(matches!(result, Err(MeshError::CornerCountMismatch { num_corners: 4 })));
    }

    #[test]
    fn test_roundtrip() {
        let (positions, triangles) = quad();
        let mesh: CornerMesh = build_from_triangles(&positions, &triangles).unwrap();
        let (out_positions, out_triangles) = to_face_vertex(&mesh);

        assert_eq!(out_positions, positions);
        assert_eq!(out_triangles, triangles);
    }
}
