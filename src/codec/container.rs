//! Binary container for compressed meshes.
//!
//! # Layout
//!
//! All multi-byte values are little-endian.
//!
//! | Field            | Size                  | Notes                                  |
//! |------------------|-----------------------|----------------------------------------|
//! | magic            | 4 bytes               | `CLRS`                                 |
//! | version          | `u8`                  | currently 1                            |
//! | flags            | `u8`                  | bit 0: hole flags present              |
//! | symbol count     | `u32`                 | symbols after the implicit `B`         |
//! | apex count       | `u32`                 | one per `C`                            |
//! | seed positions   | 9 × `f64`             | the `B` triangle                       |
//! | symbols          | bits                  | `C`=0 `S`=100 `R`=101 `L`=110 `E`=111  |
//! | hole flags       | 1 bit per apex        | only when flag bit 0 is set            |
//! | padding          | to a byte boundary    |                                        |
//! | apex positions   | 3 × `f64` per non-hole apex |                                  |
//!
//! Bits are packed most significant first.

use nalgebra::Point3;

use crate::error::{MeshError, Result};

use super::symbol::{Apex, Symbol};
use super::CompressedMesh;

const MAGIC: &[u8; 4] = b"CLRS";
const VERSION: u8 = 1;
const FLAG_HOLES: u8 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 4 + 1 + 1 + 4 + 4 + 9 * 8;

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    used: u8,
}

impl BitWriter {
    fn write_bit(&mut self, bit: bool) {
        if self.used == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> self.used;
            }
        }
        self.used = (self.used + 1) % 8;
    }

    fn write_bits(&mut self, value: u8, count: u8) {
        for k in (0..count).rev() {
            self.write_bit((value >> k) & 1 == 1);
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    bit: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit: 0 }
    }

    fn read_bit(&mut self, expected: &'static str) -> Result<bool> {
        let byte = self
            .bytes
            .get(self.bit / 8)
            .ok_or(MeshError::StreamExhausted {
                expected,
                position: self.bit / 8,
            })?;
        let bit = byte & (0x80 >> (self.bit % 8)) != 0;
        self.bit += 1;
        Ok(bit)
    }

    fn read_symbol(&mut self) -> Result<Symbol> {
        if !self.read_bit("symbol")? {
            return Ok(Symbol::C);
        }
        let high = self.read_bit("symbol")?;
        let low = self.read_bit("symbol")?;
        Ok(match (high, low) {
            (false, false) => Symbol::S,
            (false, true) => Symbol::R,
            (true, false) => Symbol::L,
            (true, true) => Symbol::E,
        })
    }

    /// Bytes consumed, counting a partial byte as whole.
    fn bytes_read(&self) -> usize {
        (self.bit + 7) / 8
    }
}

fn write_symbol(writer: &mut BitWriter, symbol: Symbol) -> Result<()> {
    match symbol {
        Symbol::C => writer.write_bit(false),
        Symbol::S => writer.write_bits(0b100, 3),
        Symbol::R => writer.write_bits(0b101, 3),
        Symbol::L => writer.write_bits(0b110, 3),
        Symbol::E => writer.write_bits(0b111, 3),
        Symbol::B => return Err(MeshError::malformed("B after the first symbol")),
    }
    Ok(())
}

fn write_point(out: &mut Vec<u8>, p: &Point3<f64>) {
    for x in [p.x, p.y, p.z] {
        out.extend_from_slice(&x.to_le_bytes());
    }
}

/// Byte cursor over the fixed-size fields.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, expected: &'static str) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(MeshError::StreamExhausted {
                expected,
                position: self.pos,
            })?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self, expected: &'static str) -> Result<u8> {
        Ok(self.take(1, expected)?[0])
    }

    fn read_u32(&mut self, expected: &'static str) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4, expected)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_f64(&mut self, expected: &'static str) -> Result<f64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, expected)?);
        Ok(f64::from_le_bytes(buf))
    }

    fn read_point(&mut self, expected: &'static str) -> Result<Point3<f64>> {
        let x = self.read_f64(expected)?;
        let y = self.read_f64(expected)?;
        let z = self.read_f64(expected)?;
        Ok(Point3::new(x, y, z))
    }
}

/// Serialize a compressed mesh.
pub fn write(mesh: &CompressedMesh) -> Result<Vec<u8>> {
    if mesh.symbols.first() != Some(&Symbol::B) {
        return Err(MeshError::malformed("stream does not start with B"));
    }
    let symbols = &mesh.symbols[1..];
    let num_symbols = u32::try_from(symbols.len())
        .map_err(|_| MeshError::invalid_param("symbols", symbols.len(), "too many for a u32"))?;
    let num_apexes = u32::try_from(mesh.apexes.len())
        .map_err(|_| MeshError::invalid_param("apexes", mesh.apexes.len(), "too many for a u32"))?;
    let has_holes = mesh.apexes.iter().any(Apex::is_hole);

    let mut out = Vec::with_capacity(HEADER_LEN + symbols.len() / 2 + 24 * mesh.apexes.len());
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.push(if has_holes { FLAG_HOLES } else { 0 });
    out.extend_from_slice(&num_symbols.to_le_bytes());
    out.extend_from_slice(&num_apexes.to_le_bytes());
    for p in &mesh.seed_positions {
        write_point(&mut out, p);
    }

    let mut bits = BitWriter::default();
    for &s in symbols {
        write_symbol(&mut bits, s)?;
    }
    if has_holes {
        for apex in &mesh.apexes {
            bits.write_bit(apex.is_hole());
        }
    }
    out.extend_from_slice(&bits.into_bytes());

    for apex in &mesh.apexes {
        if let Apex::Position(p) = apex {
            write_point(&mut out, p);
        }
    }

    log::debug!(
        "wrote container: {} symbols, {} apexes, {} bytes",
        mesh.symbols.len(),
        mesh.apexes.len(),
        out.len()
    );
    Ok(out)
}

/// Parse a compressed mesh.
///
/// Fails with [`MeshError::StreamExhausted`] on truncated input and with
/// [`MeshError::MalformedStream`] on a bad header or trailing bytes.
pub fn read(bytes: &[u8]) -> Result<CompressedMesh> {
    let mut cursor = Cursor { bytes, pos: 0 };

    if cursor.take(4, "header")? != MAGIC {
        return Err(MeshError::malformed("bad magic"));
    }
    let version = cursor.read_u8("header")?;
    if version != VERSION {
        return Err(MeshError::malformed(format!("unsupported version {}", version)));
    }
    let flags = cursor.read_u8("header")?;
    let num_symbols = cursor.read_u32("header")? as usize;
    let num_apexes = cursor.read_u32("header")? as usize;
    let seed_positions = [
        cursor.read_point("header")?,
        cursor.read_point("header")?,
        cursor.read_point("header")?,
    ];

    let mut bits = BitReader::new(&bytes[cursor.pos..]);
    // Cap the reservation: a symbol takes at least one bit.
    let mut symbols = Vec::with_capacity(1 + num_symbols.min(8 * bytes.len()));
    symbols.push(Symbol::B);
    for _ in 0..num_symbols {
        symbols.push(bits.read_symbol()?);
    }

    let num_c = symbols.iter().filter(|&&s| s == Symbol::C).count();
    if num_c != num_apexes {
        return Err(MeshError::malformed(format!(
            "{} apexes for {} C symbols",
            num_apexes, num_c
        )));
    }

    let mut holes = vec![false; num_apexes];
    if flags & FLAG_HOLES != 0 {
        for hole in &mut holes {
            *hole = bits.read_bit("hole flag")?;
        }
    }
    cursor.pos += bits.bytes_read();

    let apexes = holes
        .iter()
        .map(|&hole| {
            if hole {
                Ok(Apex::Hole)
            } else {
                cursor.read_point("position").map(Apex::Position)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if cursor.pos != bytes.len() {
        return Err(MeshError::malformed(format!(
            "{} trailing bytes",
            bytes.len() - cursor.pos
        )));
    }

    Ok(CompressedMesh {
        symbols,
        seed_positions,
        apexes,
    })
}
