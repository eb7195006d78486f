//! CLERS encoder.
//!
//! The traversal grows a region of visited triangles from a seed triangle. The
//! current corner `c` sits in the triangle just across the region boundary;
//! its classification depends on whether the vertex of `c` and the triangles
//! left and right of `c` were visited:
//!
//! | vertex   | right   | left    | symbol | next corner                     |
//! |----------|---------|---------|--------|---------------------------------|
//! | new      |         |         | `C`    | `right(c)`                      |
//! | visited  | visited | visited | `E`    | pop the stack, or stop if empty |
//! | visited  | visited | new     | `R`    | `left(c)`                       |
//! | visited  | new     | visited | `L`    | `right(c)`                      |
//! | visited  | new     | new     | `S`    | push `left(c)`, go `right(c)`   |

use crate::algo::{connected_components, extract_component, fill_holes};
use crate::error::{MeshError, Result};
use crate::mesh::{CornerId, CornerMesh, CornerTable, Marks, MeshIndex, TriangleId, VertexId};

use super::symbol::{Apex, Symbol};
use super::CompressedMesh;

/// Options for mesh encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Seed corner, in the corner numbering of the input mesh. Its triangle
    /// becomes the `B` triangle and must be visible.
    pub seed: usize,

    /// Close border loops with hole fans before encoding. When false, a mesh
    /// with a border is rejected with [`MeshError::OpenBoundary`].
    pub fill_holes: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            fill_holes: true,
        }
    }
}

impl EncodeOptions {
    /// Set the seed corner.
    pub fn with_seed(mut self, seed: usize) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable hole filling.
    pub fn with_fill_holes(mut self, fill: bool) -> Self {
        self.fill_holes = fill;
        self
    }
}

/// Result of [`encode_connectivity`].
#[derive(Debug, Clone)]
pub struct ConnectivityCode<I: MeshIndex = u32> {
    /// `B` followed by one symbol per further triangle.
    pub symbols: Vec<Symbol>,

    /// Vertices in decoding order: the seed triangle's three, then one per `C`.
    pub vertex_order: Vec<VertexId<I>>,

    /// Triangle visited at each symbol.
    pub triangle_order: Vec<TriangleId<I>>,

    /// Largest number of deferred `S` branches held at once.
    pub max_stack_depth: usize,
}

/// Encode the connectivity of a closed table from a seed corner.
///
/// The seed's vertex, then its next and previous vertices, become vertices 0, 1
/// and 2 of the decoded table. Fails with [`MeshError::OpenBoundary`] on a
/// border corner and with [`MeshError::DisconnectedComponent`] when triangles
/// remain unvisited.
pub fn encode_connectivity<I: MeshIndex>(
    table: &CornerTable<I>,
    seed: CornerId<I>,
) -> Result<ConnectivityCode<I>> {
    table.check_corner(seed)?;
    if let Some(c) = table.border_corners().next() {
        return Err(MeshError::OpenBoundary { corner: c.index() });
    }

    let num_triangles = table.num_triangles();
    let mut visited_triangles = Marks::new(num_triangles);
    let mut visited_vertices = Marks::new(table.num_vertices());
    let mut stack: Vec<CornerId<I>> = Vec::new();
    let mut max_stack_depth = 0;

    let mut symbols = Vec::with_capacity(num_triangles);
    let mut vertex_order = Vec::with_capacity(table.num_vertices());
    let mut triangle_order = Vec::with_capacity(num_triangles);

    visited_triangles.mark(seed.triangle().index());
    triangle_order.push(seed.triangle());
    symbols.push(Symbol::B);
    for c in [seed, seed.next(), seed.prev()] {
        let v = table.vertex(c);
        visited_vertices.mark(v.index());
        vertex_order.push(v);
    }

    let mut c = table.right(seed);
    loop {
        let t = c.triangle();
        if !visited_triangles.mark(t.index()) {
            return Err(MeshError::InvalidState(format!(
                "traversal re-entered triangle {:?}",
                t
            )));
        }
        triangle_order.push(t);

        let v = table.vertex(c);
        if visited_vertices.mark(v.index()) {
            symbols.push(Symbol::C);
            vertex_order.push(v);
            c = table.right(c);
            continue;
        }

        let right_done = visited_triangles.is_marked(table.right(c).triangle().index());
        let left_done = visited_triangles.is_marked(table.left(c).triangle().index());

        match (right_done, left_done) {
            (true, true) => {
                symbols.push(Symbol::E);
                match stack.pop() {
                    Some(next) => c = next,
                    None => break,
                }
            }
            (true, false) => {
                symbols.push(Symbol::R);
                c = table.left(c);
            }
            (false, true) => {
                symbols.push(Symbol::L);
                c = table.right(c);
            }
            (false, false) => {
                symbols.push(Symbol::S);
                stack.push(table.left(c));
                max_stack_depth = max_stack_depth.max(stack.len());
                c = table.right(c);
            }
        }
    }

    if visited_triangles.count() < num_triangles {
        return Err(MeshError::DisconnectedComponent {
            visited: visited_triangles.count(),
            total: num_triangles,
        });
    }

    log::debug!(
        "encoded {} triangles into {} symbols (stack depth {})",
        num_triangles,
        symbols.len(),
        max_stack_depth
    );

    Ok(ConnectivityCode {
        symbols,
        vertex_order,
        triangle_order,
        max_stack_depth,
    })
}

/// A compressed mesh together with the vertex correspondence.
#[derive(Debug, Clone)]
pub struct Encoding<I: MeshIndex = u32> {
    /// Symbols and positions.
    pub compressed: CompressedMesh,

    /// For each vertex of the decoded mesh, the input vertex it encodes.
    pub vertex_order: Vec<VertexId<I>>,

    /// Number of holes closed before encoding.
    pub holes_filled: usize,
}

/// Check that a closed mesh is one manifold sphere.
fn check_sphere<I: MeshIndex>(mesh: &CornerMesh<I>, seed: CornerId<I>) -> Result<()> {
    let table = mesh.table();

    let mut corner_counts = vec![0usize; mesh.num_vertices()];
    for v in table.vertex_table() {
        corner_counts[v.index()] += 1;
    }
    for (v, &count) in corner_counts.iter().enumerate() {
        if count > 0 && table.swing_valence(VertexId::new(v)) != count {
            return Err(MeshError::NonManifoldVertex { vertex: v });
        }
    }

    let components = connected_components(table);
    if components.count() > 1 {
        return Err(MeshError::DisconnectedComponent {
            visited: components.sizes()[components.label(seed.triangle())],
            total: mesh.num_triangles(),
        });
    }

    let chi = mesh.euler_characteristic();
    if chi != 2 {
        return Err(MeshError::UnsupportedTopology {
            euler_characteristic: chi,
        });
    }

    Ok(())
}

/// Encode a mesh into symbols and positions.
///
/// Hidden triangles and vertices no triangle uses are dropped first. Border
/// loops are then closed with hole fans (unless disabled), and the closed
/// mesh must be a single manifold sphere. The apex of a `C` symbol that lands
/// on a hole tip is recorded as [`Apex::Hole`].
///
/// # Example
/// ```
/// use clers::codec::{encode, EncodeOptions};
/// use clers::mesh::{build_from_triangles, CornerMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: CornerMesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();
///
/// let encoding = encode(&mesh, &EncodeOptions::default()).unwrap();
/// assert_eq!(encoding.compressed.symbol_string(), "BCRE");
/// assert!(encoding.compressed.apexes[0].is_hole());
/// ```
pub fn encode<I: MeshIndex>(mesh: &CornerMesh<I>, options: &EncodeOptions) -> Result<Encoding<I>> {
    if options.seed >= mesh.num_corners() {
        return Err(MeshError::invalid_param(
            "seed",
            options.seed,
            "must be a corner of the mesh",
        ));
    }
    let seed_triangle = options.seed / 3;
    if !mesh.is_visible(TriangleId::new(seed_triangle)) {
        return Err(MeshError::invalid_param(
            "seed",
            options.seed,
            "must be a corner of a visible triangle",
        ));
    }
    // Compaction keeps visible triangles in order.
    let kept_before = (0..seed_triangle)
        .filter(|&t| mesh.is_visible(TriangleId::new(t)))
        .count();
    let seed = CornerId::<I>::new(3 * kept_before + options.seed % 3);

    let mut work = mesh.clone();
    let remap = work.compact();
    if work.num_triangles() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut origin = vec![VertexId::<I>::invalid(); work.num_vertices()];
    for (old, new) in remap.iter().enumerate() {
        if let Some(new) = new {
            origin[new.index()] = VertexId::new(old);
        }
    }

    let mut is_hole = vec![false; work.num_vertices()];
    let mut holes_filled = 0;
    if !work.table().is_closed() {
        if !options.fill_holes {
            let corner = work
                .table()
                .border_corners()
                .next()
                .map_or(0, |c| c.index());
            return Err(MeshError::OpenBoundary { corner });
        }
        let tips = fill_holes(&mut work)?;
        log::warn!("mesh has {} border loop(s); encoding with hole fans", tips.len());
        is_hole.resize(work.num_vertices(), false);
        for tip in &tips {
            is_hole[tip.index()] = true;
        }
        holes_filled = tips.len();
    }

    check_sphere(&work, seed)?;
    let code = encode_connectivity(work.table(), seed)?;

    let seed_positions = [
        *work.position(code.vertex_order[0]),
        *work.position(code.vertex_order[1]),
        *work.position(code.vertex_order[2]),
    ];
    let apexes = code.vertex_order[3..]
        .iter()
        .map(|&v| {
            if is_hole[v.index()] {
                Apex::Hole
            } else {
                Apex::Position(*work.position(v))
            }
        })
        .collect();

    let vertex_order = code
        .vertex_order
        .iter()
        .filter(|v| !is_hole[v.index()])
        .map(|v| origin[v.index()])
        .collect();

    Ok(Encoding {
        compressed: CompressedMesh {
            symbols: code.symbols,
            seed_positions,
            apexes,
        },
        vertex_order,
        holes_filled,
    })
}

/// Encode every edge-connected component separately, each from its corner 0.
///
/// Vertex orders refer to the vertices of `mesh`.
pub fn encode_components<I: MeshIndex>(
    mesh: &CornerMesh<I>,
    options: &EncodeOptions,
) -> Result<Vec<Encoding<I>>> {
    let mut work = mesh.clone();
    let remap = work.compact();
    if work.num_triangles() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut origin = vec![VertexId::<I>::invalid(); work.num_vertices()];
    for (old, new) in remap.iter().enumerate() {
        if let Some(new) = new {
            origin[new.index()] = VertexId::new(old);
        }
    }

    let components = connected_components(work.table());
    let part_options = options.clone().with_seed(0);

    (0..components.count())
        .map(|k| {
            let (part, part_origin) = extract_component(&work, &components, k);
            let mut encoding = encode(&part, &part_options)?;
            for v in &mut encoding.vertex_order {
                *v = origin[part_origin[v.index()].index()];
            }
            Ok(encoding)
        })
        .collect()
}
