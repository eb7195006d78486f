//! CLERS decoder.
//!
//! Decoding replays the traversal: every symbol glues one new triangle onto
//! the current gate. Edges whose partner is not known yet are left pending and
//! zipped together as soon as `L` and `E` symbols close them off. Vertices of
//! non-`C` triangles are resolved during zipping.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{
    build_from_triangles, CornerId, CornerMesh, CornerTable, Geometry, MeshIndex, TriangleId,
    VertexId,
};

use super::symbol::{Apex, Symbol};
use super::CompressedMesh;

/// State of the edge opposite a corner during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Paired with the given corner.
    Linked(usize),
    /// Open edge on the far side of a new vertex.
    Free,
    /// Edge waiting to be zipped shut.
    Zip,
    /// Gate not crossed yet.
    Gate,
}

#[inline]
fn next(c: usize) -> usize {
    if c % 3 == 2 {
        c - 2
    } else {
        c + 1
    }
}

#[inline]
fn prev(c: usize) -> usize {
    if c % 3 == 0 {
        c + 2
    } else {
        c - 1
    }
}

struct Zipper {
    vertices: Vec<Option<usize>>,
    edges: Vec<Edge>,
}

impl Zipper {
    fn link(&mut self, a: usize, b: usize) {
        self.edges[a] = Edge::Linked(b);
        self.edges[b] = Edge::Linked(a);
    }

    /// Walk around the fan starting at `c` with `step` while edges are linked.
    fn walk(&self, mut c: usize, stop: usize, step: fn(usize) -> usize) -> Result<usize> {
        let mut guard = self.edges.len();
        while let Edge::Linked(o) = self.edges[c] {
            if o == stop {
                break;
            }
            c = step(o);
            guard = guard
                .checked_sub(1)
                .ok_or_else(|| MeshError::malformed("zipping does not terminate"))?;
        }
        Ok(c)
    }

    /// Zip the pending edge at `c` with its free neighbours for as long as
    /// the fan keeps closing.
    fn zip(&mut self, mut c: usize) -> Result<()> {
        loop {
            let b = self.walk(prev(c), c, prev)?;
            if self.edges[b] != Edge::Free {
                return Ok(());
            }

            self.link(c, b);
            let vb = self.vertices[next(b)];
            let mut a = next(c);
            self.vertices[next(a)] = vb;
            let mut guard = self.edges.len();
            while let Edge::Linked(o) = self.edges[a] {
                if a == b {
                    break;
                }
                a = next(o);
                self.vertices[next(a)] = vb;
                guard = guard
                    .checked_sub(1)
                    .ok_or_else(|| MeshError::malformed("vertex fan does not close"))?;
            }

            c = next(c);
            let mut guard = self.edges.len();
            while let Edge::Linked(o) = self.edges[c] {
                if c == b {
                    break;
                }
                c = next(o);
                guard = guard
                    .checked_sub(1)
                    .ok_or_else(|| MeshError::malformed("zipping does not terminate"))?;
            }
            if self.edges[c] != Edge::Zip {
                return Ok(());
            }
        }
    }
}

/// Rebuild a corner table from a symbol stream.
///
/// Vertices 0, 1 and 2 are the seed triangle's; each `C` adds the next
/// vertex. Fails with [`MeshError::StreamExhausted`] when the stream ends
/// before the traversal closes, and with [`MeshError::MalformedStream`] when
/// it is not the image of any traversal.
pub fn decode_connectivity<I: MeshIndex>(symbols: &[Symbol]) -> Result<CornerTable<I>> {
    match symbols.first() {
        None => {
            return Err(MeshError::StreamExhausted {
                expected: "symbol",
                position: 0,
            })
        }
        Some(Symbol::B) => {}
        Some(s) => {
            return Err(MeshError::malformed(format!(
                "stream starts with {} instead of B",
                s
            )))
        }
    }

    let mut z = Zipper {
        vertices: Vec::with_capacity(3 * symbols.len()),
        edges: Vec::with_capacity(3 * symbols.len()),
    };
    z.vertices.extend([Some(0), Some(1), Some(2)]);
    z.edges.extend([Edge::Free; 3]);

    let mut num_vertices = 3;
    let mut stack: Vec<usize> = Vec::new();
    let mut c = 2;
    let mut position = 1;
    let mut done = false;

    while position < symbols.len() {
        let symbol = symbols[position];
        position += 1;

        let base = z.vertices.len();
        let (gate_prev, gate_next) = (z.vertices[prev(c)], z.vertices[next(c)]);
        z.vertices.extend([None, gate_prev, gate_next]);
        z.edges.extend([Edge::Gate; 3]);
        z.link(c, base);
        c = base + 2;

        match symbol {
            Symbol::C => {
                z.edges[prev(c)] = Edge::Free;
                z.vertices[base] = Some(num_vertices);
                num_vertices += 1;
            }
            Symbol::L => {
                z.edges[prev(c)] = Edge::Zip;
                z.zip(prev(c))?;
            }
            Symbol::R => {
                z.edges[c] = Edge::Zip;
                c = prev(c);
            }
            Symbol::S => stack.push(prev(c)),
            Symbol::E => {
                z.edges[c] = Edge::Zip;
                z.edges[prev(c)] = Edge::Zip;
                z.zip(prev(c))?;

                // Branches closed by zipping are skipped.
                loop {
                    match stack.pop() {
                        None => {
                            done = true;
                            break;
                        }
                        Some(top) => {
                            if !matches!(z.edges[top], Edge::Linked(_)) {
                                c = top;
                                break;
                            }
                        }
                    }
                }
                if done {
                    break;
                }
            }
            Symbol::B => {
                return Err(MeshError::malformed(format!(
                    "B at position {}",
                    position - 1
                )))
            }
        }
    }

    if !done {
        return Err(MeshError::StreamExhausted {
            expected: "symbol",
            position,
        });
    }
    if position != symbols.len() {
        return Err(MeshError::malformed(format!(
            "{} symbols after the traversal closed",
            symbols.len() - position
        )));
    }

    let opposites = z
        .edges
        .iter()
        .enumerate()
        .map(|(corner, edge)| match edge {
            Edge::Linked(o) => Ok(CornerId::new(*o)),
            _ => Err(MeshError::malformed(format!("edge at corner {} was never closed", corner))),
        })
        .collect::<Result<Vec<_>>>()?;
    let vertices = z
        .vertices
        .iter()
        .enumerate()
        .map(|(corner, v)| {
            v.map(VertexId::new)
                .ok_or_else(|| MeshError::malformed(format!("corner {} has no vertex", corner)))
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "decoded {} symbols into {} triangles and {} vertices",
        symbols.len(),
        vertices.len() / 3,
        num_vertices
    );

    CornerTable::from_raw_parts(vertices, opposites, num_vertices)
        .map_err(|e| MeshError::malformed(format!("decoded table is invalid: {}", e)))
}

/// Rebuild a mesh from its compressed form.
///
/// Triangles around hole vertices are dropped, so a mesh encoded with
/// [`super::encode`] comes back with its original borders. Vertex `k` of the
/// result corresponds to entry `k` of the encoder's vertex order.
pub fn decode<I: MeshIndex>(compressed: &CompressedMesh) -> Result<CornerMesh<I>> {
    let table = decode_connectivity::<I>(&compressed.symbols)?;

    let expected = table.num_vertices() - 3;
    if compressed.apexes.len() < expected {
        return Err(MeshError::StreamExhausted {
            expected: "apex",
            position: compressed.apexes.len(),
        });
    }
    if compressed.apexes.len() > expected {
        return Err(MeshError::malformed(format!(
            "{} apexes for {} C symbols",
            compressed.apexes.len(),
            expected
        )));
    }

    let mut positions = Vec::with_capacity(table.num_vertices());
    positions.extend_from_slice(&compressed.seed_positions);
    let mut holes = vec![false; 3];
    for apex in &compressed.apexes {
        match apex {
            Apex::Position(p) => {
                positions.push(*p);
                holes.push(false);
            }
            Apex::Hole => {
                positions.push(Point3::origin());
                holes.push(true);
            }
        }
    }

    let mut mesh = CornerMesh::from_parts(Geometry::from_positions(positions), table)?;
    let hidden: Vec<TriangleId<I>> = mesh
        .table()
        .triangle_ids()
        .filter(|&t| mesh.table().triangle_vertices(t).iter().any(|v| holes[v.index()]))
        .collect();
    if !hidden.is_empty() {
        for &t in &hidden {
            mesh.hide(t);
        }
        mesh.compact();
        log::debug!("dropped {} hole triangles", hidden.len());
    }

    Ok(mesh)
}

/// Decode a list of per-component encodings into one mesh.
///
/// Components are concatenated in order, then opposites are rebuilt over the
/// union.
pub fn decode_components<I: MeshIndex>(parts: &[CompressedMesh]) -> Result<CornerMesh<I>> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for part in parts {
        let mesh = decode::<I>(part)?;
        let offset = positions.len();
        positions.extend_from_slice(mesh.geometry().positions());
        triangles.extend(mesh.table().triangles().map(|[a, b, c]| {
            [a.index() + offset, b.index() + offset, c.index() + offset]
        }));
    }

    if triangles.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    build_from_triangles(&positions, &triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::symbol::parse_symbols;
    use crate::codec::{encode, encode_components, EncodeOptions};
    use crate::mesh::fixtures;

    fn symbols(text: &str) -> Vec<Symbol> {
        parse_symbols(text).unwrap()
    }

    /// Decode `mesh` and compare triangle sets after relabelling.
    fn assert_round_trip(mesh: &CornerMesh, options: &EncodeOptions) {
        let encoding = encode(mesh, options).unwrap();
        let decoded: CornerMesh = decode(&encoding.compressed).unwrap();

        assert_eq!(decoded.num_vertices(), encoding.vertex_order.len());
        assert_eq!(decoded.num_triangles(), mesh.num_visible_triangles());
        assert!(decoded.table().is_valid());

        let relabelled = decoded.table().triangles().map(|t| {
            [
                encoding.vertex_order[t[0].index()].index(),
                encoding.vertex_order[t[1].index()].index(),
                encoding.vertex_order[t[2].index()].index(),
            ]
        });
        assert_eq!(
            fixtures::canonical_triangles(relabelled),
            fixtures::canonical_triangles(fixtures::triangle_list(mesh))
        );

        for (k, &v) in encoding.vertex_order.iter().enumerate() {
            assert_eq!(decoded.position(VertexId::new(k)), mesh.position(v));
        }
    }

    #[test]
    fn test_decode_tetrahedron_stream() {
        let table: CornerTable = decode_connectivity(&symbols("BCRE")).unwrap();
        assert_eq!(table.num_triangles(), 4);
        assert_eq!(table.num_vertices(), 4);
        assert!(table.is_closed());

        let triangles: Vec<[usize; 3]> = table
            .triangles()
            .map(|t| [t[0].index(), t[1].index(), t[2].index()])
            .collect();
        assert_eq!(triangles, vec![[0, 1, 2], [3, 1, 0], [2, 1, 3], [0, 2, 3]]);
    }

    #[test]
    fn test_round_trip_closed_meshes() {
        let options = EncodeOptions::default();
        assert_round_trip(&fixtures::tetrahedron(), &options);
        assert_round_trip(&fixtures::octahedron(), &options);
        assert_round_trip(&fixtures::icosphere(0), &options);
        assert_round_trip(&fixtures::icosphere(2), &options);
    }

    #[test]
    fn test_round_trip_every_seed() {
        let mesh = fixtures::icosphere(1);
        for seed in 0..mesh.num_corners() {
            assert_round_trip(&mesh, &EncodeOptions::default().with_seed(seed));
        }
    }

    #[test]
    fn test_round_trip_flipped() {
        for seed in 0..4 {
            let mesh = fixtures::flipped_icosphere(2, 60, seed);
            assert_round_trip(&mesh, &EncodeOptions::default().with_seed(7 * seed as usize));
        }
    }

    #[test]
    fn test_round_trip_open_meshes() {
        let options = EncodeOptions::default();
        assert_round_trip(&fixtures::single_triangle(), &options);
        assert_round_trip(&fixtures::two_triangles(), &options);
        assert_round_trip(&fixtures::hex_fan(), &options);
        assert_round_trip(&fixtures::grid(5, 3), &options);

        let fan = fixtures::hex_fan();
        for seed in 0..fan.num_corners() {
            assert_round_trip(&fan, &EncodeOptions::default().with_seed(seed));
        }
    }

    #[test]
    fn test_single_triangle_decodes_to_one_triangle() {
        let mesh = fixtures::single_triangle();
        let encoding = encode(&mesh, &EncodeOptions::default()).unwrap();
        let decoded: CornerMesh = decode(&encoding.compressed).unwrap();

        assert_eq!(decoded.num_triangles(), 1);
        assert_eq!(decoded.num_vertices(), 3);
        assert_eq!(decoded.table().border_corners().count(), 3);
    }

    #[test]
    fn test_empty_and_seed_only_streams() {
        assert!(matches!(
            decode_connectivity::<u32>(&[]),
            Err(MeshError::StreamExhausted { position: 0, .. })
        ));
        assert!(matches!(
            decode_connectivity::<u32>(&symbols("B")),
            Err(MeshError::StreamExhausted { expected: "symbol", position: 1 })
        ));
    }

    #[test]
    fn test_truncated_stream() {
        assert!(matches!(
            decode_connectivity::<u32>(&symbols("BCCRCRR")),
            Err(MeshError::StreamExhausted { expected: "symbol", .. })
        ));
    }

    #[test]
    fn test_malformed_streams() {
        for text in ["CRE", "BCRB", "BCREC", "BLE", "BRE"] {
            assert!(
                matches!(
                    decode_connectivity::<u32>(&symbols(text)),
                    Err(MeshError::MalformedStream(_))
                ),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_apex_count_checked() {
        let mesh = fixtures::octahedron();
        let mut compressed = encode(&mesh, &EncodeOptions::default()).unwrap().compressed;

        compressed.apexes.push(Apex::Hole);
        assert!(matches!(decode::<u32>(&compressed), Err(MeshError::MalformedStream(_))));

        compressed.apexes.truncate(1);
        assert!(matches!(
            decode::<u32>(&compressed),
            Err(MeshError::StreamExhausted { expected: "apex", position: 1 })
        ));
    }

    #[test]
    fn test_components_round_trip() {
        let mesh = fixtures::two_tetrahedra();
        let encodings = encode_components(&mesh, &EncodeOptions::default()).unwrap();
        let parts: Vec<CompressedMesh> = encodings.iter().map(|e| e.compressed.clone()).collect();
        let decoded: CornerMesh = decode_components(&parts).unwrap();

        assert_eq!(decoded.num_triangles(), 8);
        assert_eq!(decoded.num_vertices(), 8);
        assert!(decoded.table().is_closed());

        let order: Vec<VertexId> = encodings.iter().flat_map(|e| e.vertex_order.clone()).collect();
        let relabelled = decoded
            .table()
            .triangles()
            .map(|t| [order[t[0].index()].index(), order[t[1].index()].index(), order[t[2].index()].index()]);
        assert_eq!(
            fixtures::canonical_triangles(relabelled),
            fixtures::canonical_triangles(fixtures::triangle_list(&mesh))
        );
    }
}
