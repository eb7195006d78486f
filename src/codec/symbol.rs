//! The CLERS alphabet.

use std::fmt;

use nalgebra::Point3;

use crate::error::{MeshError, Result};

/// One traversal step.
///
/// Every stream starts with [`Symbol::B`] for the seed triangle. Each of the
/// other symbols adds one triangle; only [`Symbol::C`] adds a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Seed triangle.
    B,
    /// The apex is a new vertex.
    C,
    /// The left neighbour was already visited.
    L,
    /// Both neighbours were already visited: the region closes.
    E,
    /// The right neighbour was already visited.
    R,
    /// Neither neighbour was visited: the boundary splits in two.
    S,
}

impl Symbol {
    /// The five symbols that follow `B`, in the order used for statistics.
    pub const TERMINALS: [Symbol; 5] = [Symbol::C, Symbol::L, Symbol::E, Symbol::R, Symbol::S];

    /// Letter of this symbol.
    pub fn as_char(self) -> char {
        match self {
            Symbol::B => 'B',
            Symbol::C => 'C',
            Symbol::L => 'L',
            Symbol::E => 'E',
            Symbol::R => 'R',
            Symbol::S => 'S',
        }
    }

    /// Parse a letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(Symbol::B),
            'C' => Some(Symbol::C),
            'L' => Some(Symbol::L),
            'E' => Some(Symbol::E),
            'R' => Some(Symbol::R),
            'S' => Some(Symbol::S),
            _ => None,
        }
    }

    /// Position in [`Symbol::TERMINALS`]; `None` for `B`.
    pub fn terminal_index(self) -> Option<usize> {
        match self {
            Symbol::B => None,
            Symbol::C => Some(0),
            Symbol::L => Some(1),
            Symbol::E => Some(2),
            Symbol::R => Some(3),
            Symbol::S => Some(4),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse a string such as `"BCCRE"`. Whitespace is ignored.
pub fn parse_symbols(text: &str) -> Result<Vec<Symbol>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| {
            Symbol::from_char(c)
                .ok_or_else(|| MeshError::malformed(format!("invalid symbol {:?} at {}", c, i)))
        })
        .collect()
}

/// Render symbols as a string of letters.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

/// Payload of one `C` symbol: the position of the new vertex, or a marker for
/// the tip of a filled hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Apex {
    /// A vertex of the input mesh.
    Position(Point3<f64>),
    /// A vertex added to close a hole; its triangles are dropped on decode.
    Hole,
}

impl Apex {
    /// Check if this apex marks a hole.
    pub fn is_hole(&self) -> bool {
        matches!(self, Apex::Hole)
    }
}
