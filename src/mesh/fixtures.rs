//! Test meshes shared by the unit tests.

use std::collections::HashMap;

use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::builder::build_from_triangles;
use super::corner_mesh::CornerMesh;
use super::index::{CornerId, VertexId};

fn build(positions: Vec<Point3<f64>>, triangles: &[[usize; 3]]) -> CornerMesh {
    build_from_triangles(&positions, triangles).unwrap()
}

/// One triangle in the xy plane.
pub(crate) fn single_triangle() -> CornerMesh {
    build(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        &[[0, 1, 2]],
    )
}

/// A unit square split along the diagonal (0, 2).
pub(crate) fn two_triangles() -> CornerMesh {
    build(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        &[[0, 1, 2], [0, 2, 3]],
    )
}

pub(crate) fn tetrahedron_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    (positions, triangles)
}

pub(crate) fn tetrahedron() -> CornerMesh {
    let (positions, triangles) = tetrahedron_triangles();
    build(positions, &triangles)
}

/// Two tetrahedra with no shared vertex.
pub(crate) fn two_tetrahedra() -> CornerMesh {
    let (mut positions, mut triangles) = tetrahedron_triangles();
    let shifted: Vec<Point3<f64>> = positions
        .iter()
        .map(|p| Point3::new(p.x + 3.0, p.y, p.z))
        .collect();
    let offset: Vec<[usize; 3]> = triangles
        .iter()
        .map(|t| [t[0] + 4, t[1] + 4, t[2] + 4])
        .collect();
    positions.extend(shifted);
    triangles.extend(offset);
    build(positions, &triangles)
}

pub(crate) fn octahedron() -> CornerMesh {
    build(
        vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ],
        &[
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    )
}

fn icosahedron_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let t = (1.0 + 5.0f64.sqrt()) / 2.0;
    let positions = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|p| Point3::new(p[0], p[1], p[2]) / (1.0 + t * t).sqrt())
    .collect();

    let triangles = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (positions, triangles)
}

/// Icosahedron refined `levels` times by midpoint subdivision, on the unit sphere.
pub(crate) fn icosphere_triangles(levels: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let (mut positions, mut triangles) = icosahedron_triangles();

    for _ in 0..levels {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize, positions: &mut Vec<Point3<f64>>| -> usize {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let m = Point3::from((positions[a].coords + positions[b].coords).normalize());
                positions.push(m);
                positions.len() - 1
            })
        };

        let mut refined = Vec::with_capacity(4 * triangles.len());
        for &[a, b, c] in &triangles {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            refined.push([a, ab, ca]);
            refined.push([b, bc, ab]);
            refined.push([c, ca, bc]);
            refined.push([ab, bc, ca]);
        }
        triangles = refined;
    }

    (positions, triangles)
}

pub(crate) fn icosphere(levels: usize) -> CornerMesh {
    let (positions, triangles) = icosphere_triangles(levels);
    build(positions, &triangles)
}

/// Six triangles around vertex 6; the rim vertices 0..6 lie on the border.
pub(crate) fn hex_fan() -> CornerMesh {
    let mut positions: Vec<Point3<f64>> = (0..6)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::PI / 3.0;
            Point3::new(angle.cos(), angle.sin(), 0.0)
        })
        .collect();
    positions.push(Point3::origin());

    let triangles: Vec<[usize; 3]> = (0..6).map(|i| [6, i, (i + 1) % 6]).collect();
    build(positions, &triangles)
}

/// A `cols` x `rows` grid of unit squares, each split into two triangles.
pub(crate) fn grid_triangles(cols: usize, rows: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut positions = Vec::with_capacity((cols + 1) * (rows + 1));
    for j in 0..=rows {
        for i in 0..=cols {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let index = |i: usize, j: usize| j * (cols + 1) + i;
    let mut triangles = Vec::with_capacity(2 * cols * rows);
    for j in 0..rows {
        for i in 0..cols {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i, j + 1);
            let d = index(i + 1, j + 1);
            triangles.push([a, b, d]);
            triangles.push([a, d, c]);
        }
    }

    (positions, triangles)
}

pub(crate) fn grid(cols: usize, rows: usize) -> CornerMesh {
    let (positions, triangles) = grid_triangles(cols, rows);
    build(positions, &triangles)
}

/// A closed torus with `n` x `m` quads.
pub(crate) fn torus(n: usize, m: usize) -> CornerMesh {
    let mut positions = Vec::with_capacity(n * m);
    for i in 0..n {
        let u = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        for j in 0..m {
            let v = 2.0 * std::f64::consts::PI * j as f64 / m as f64;
            let r = 2.0 + v.cos();
            positions.push(Point3::new(r * u.cos(), r * u.sin(), v.sin()));
        }
    }

    let index = |i: usize, j: usize| (i % n) * m + (j % m);
    let mut triangles = Vec::with_capacity(2 * n * m);
    for i in 0..n {
        for j in 0..m {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i, j + 1);
            let d = index(i + 1, j + 1);
            triangles.push([a, b, d]);
            triangles.push([a, d, c]);
        }
    }

    build(positions, &triangles)
}

/// An icosphere with `flips` random edge flips, giving irregular valences.
pub(crate) fn flipped_icosphere(levels: usize, flips: usize, seed: u64) -> CornerMesh {
    let (positions, mut triangles) = icosphere_triangles(levels);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut done = 0;
    let mut attempts = 0;
    while done < flips && attempts < 100 * flips {
        attempts += 1;
        let mesh = build(positions.clone(), &triangles);
        let table = mesh.table();

        let c: CornerId = CornerId::new(rng.gen_range(0..table.num_corners()));
        let o = table.opposite(c);
        let a = table.vertex(c);
        let b = table.vertex(c.next());
        let e = table.vertex(c.prev());
        let d = table.vertex(o);

        // Keep the surface a simplicial sphere with valence >= 3 everywhere.
        let valence = |v: VertexId| table.swing_valence(v);
        let edge_exists = table.ring(c).any(|x| table.vertex(x.next()) == d);
        if a == d || edge_exists || valence(b) <= 3 || valence(e) <= 3 {
            continue;
        }

        let tc = c.triangle().index();
        let to = o.triangle().index();
        triangles[tc] = [a.index(), b.index(), d.index()];
        triangles[to] = [a.index(), d.index(), e.index()];
        done += 1;
    }

    build(positions, &triangles)
}

/// Triangles rotated to start at their smallest vertex, then sorted.
pub(crate) fn canonical_triangles(triangles: impl IntoIterator<Item = [usize; 3]>) -> Vec<[usize; 3]> {
    let mut out: Vec<[usize; 3]> = triangles
        .into_iter()
        .map(|t| {
            let k = (0..3).min_by_key(|&k| t[k]).unwrap_or(0);
            [t[k], t[(k + 1) % 3], t[(k + 2) % 3]]
        })
        .collect();
    out.sort_unstable();
    out
}

/// Visible triangles of a mesh as index triples.
pub(crate) fn triangle_list(mesh: &CornerMesh) -> Vec<[usize; 3]> {
    mesh.table()
        .triangle_ids()
        .filter(|&t| mesh.is_visible(t))
        .map(|t| {
            let [a, b, c] = mesh.table().triangle_vertices(t);
            [a.index(), b.index(), c.index()]
        })
        .collect()
}
