//! Edgebreaker connectivity compression.
//!
//! The encoder walks a closed manifold mesh triangle by triangle and writes
//! one CLERS symbol per triangle; the decoder rebuilds an equivalent corner
//! table from the symbols alone. Vertex positions travel alongside: three for
//! the seed triangle and one per `C` symbol.
//!
//! Meshes with borders are handled by closing every border loop with a fan
//! around a hole vertex before encoding. The decoder drops those fans again.
//!
//! ```
//! use clers::codec::{decode, encode, EncodeOptions};
//! use clers::mesh::{build_from_triangles, CornerMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh: CornerMesh = build_from_triangles(&positions, &triangles).unwrap();
//!
//! let encoding = encode(&mesh, &EncodeOptions::default()).unwrap();
//! assert_eq!(encoding.compressed.symbol_string(), "BCRE");
//!
//! let bytes = encoding.compressed.to_bytes().unwrap();
//! let decoded: CornerMesh = decode(&clers::codec::CompressedMesh::from_bytes(&bytes).unwrap()).unwrap();
//! assert_eq!(decoded.num_triangles(), 4);
//! ```

pub mod container;
mod decoder;
mod encoder;
mod stats;
mod symbol;

use nalgebra::Point3;

use crate::error::Result;

pub use decoder::{decode, decode_components, decode_connectivity};
pub use encoder::{
    encode, encode_components, encode_connectivity, ConnectivityCode, EncodeOptions, Encoding,
};
pub use stats::ClersStats;
pub use symbol::{parse_symbols, symbols_to_string, Apex, Symbol};

/// Symbols and positions of an encoded mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedMesh {
    /// `B` followed by one symbol per further triangle.
    pub symbols: Vec<Symbol>,

    /// Positions of decoded vertices 0, 1 and 2.
    pub seed_positions: [Point3<f64>; 3],

    /// One entry per `C` symbol, in stream order.
    pub apexes: Vec<Apex>,
}

impl CompressedMesh {
    /// Number of symbols, `B` included.
    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Number of hole vertices.
    pub fn num_holes(&self) -> usize {
        self.apexes.iter().filter(|a| a.is_hole()).count()
    }

    /// The symbols as a string such as `"BCCRE"`.
    pub fn symbol_string(&self) -> String {
        symbols_to_string(&self.symbols)
    }

    /// Statistics of the symbol stream.
    pub fn stats(&self) -> ClersStats {
        ClersStats::from_symbols(&self.symbols)
    }

    /// Serialize to the binary container format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        container::write(self)
    }

    /// Parse the binary container format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        container::read(bytes)
    }
}
