//! Statistics of a CLERS stream.

use std::fmt;

use super::symbol::Symbol;

/// Symbol counts, entropies and size estimates of a stream.
///
/// Only the symbols after `B` are counted. Context counts pair each symbol
/// with its predecessor; the first symbol is counted as if preceded by `C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClersStats {
    /// Count of each symbol, in [`Symbol::TERMINALS`] order.
    pub counts: [usize; 5],
    /// `contexts[prev][cur]`, both in [`Symbol::TERMINALS`] order.
    pub contexts: [[usize; 5]; 5],
    /// Number of `C` symbols before the first other symbol.
    pub leading_c: usize,
    /// Triangles described by the stream, `B` included.
    pub num_triangles: usize,
}

fn entropy_of(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = n as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

impl ClersStats {
    /// Collect statistics from a stream.
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let mut counts = [0; 5];
        let mut contexts = [[0; 5]; 5];
        let mut leading_c = 0;
        let mut in_run = true;
        let mut last = 0;

        for k in symbols.iter().filter_map(|s| s.terminal_index()) {
            counts[k] += 1;
            contexts[last][k] += 1;
            last = k;

            if in_run && k == 0 {
                leading_c += 1;
            } else {
                in_run = false;
            }
        }

        Self {
            counts,
            contexts,
            leading_c,
            num_triangles: symbols.len(),
        }
    }

    /// Number of symbols after `B`.
    pub fn num_symbols(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Count of one symbol; 0 for `B`.
    pub fn count(&self, symbol: Symbol) -> usize {
        symbol.terminal_index().map_or(0, |k| self.counts[k])
    }

    /// Share of one symbol among the counted ones.
    pub fn frequency(&self, symbol: Symbol) -> f64 {
        match self.num_symbols() {
            0 => 0.0,
            n => self.count(symbol) as f64 / n as f64,
        }
    }

    /// Order-0 entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        entropy_of(&self.counts)
    }

    /// Entropy of each symbol given its predecessor, in bits per symbol.
    pub fn context_entropy(&self) -> f64 {
        let total = self.num_symbols();
        if total == 0 {
            return 0.0;
        }
        self.contexts
            .iter()
            .map(|row| {
                let n: usize = row.iter().sum();
                n as f64 / total as f64 * entropy_of(row)
            })
            .sum()
    }

    /// Bits used by the prefix code of the binary container.
    pub fn prefix_code_bits(&self) -> usize {
        self.counts[0] + 3 * (self.num_symbols() - self.counts[0])
    }

    /// Prefix-code bits per triangle.
    pub fn bits_per_triangle(&self) -> f64 {
        match self.num_triangles {
            0 => 0.0,
            n => self.prefix_code_bits() as f64 / n as f64,
        }
    }

    /// Order-0 entropy bound for the symbols after the leading `C` run,
    /// plus the bits needed to store the run length.
    pub fn entropy_bits_with_leading_run(&self) -> f64 {
        let mut rest = *self;
        rest.counts[0] -= self.leading_c;
        let run_bits = if self.leading_c > 1 {
            (self.leading_c as f64).log2().floor()
        } else {
            0.0
        };
        rest.entropy() * rest.num_symbols() as f64 + run_bits
    }
}

impl fmt::Display for ClersStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} triangles, {} symbols after B ({} leading C)",
            self.num_triangles,
            self.num_symbols(),
            self.leading_c
        )?;
        write!(f, "frequencies:")?;
        for s in Symbol::TERMINALS {
            write!(f, " {}={:.2}%", s, 100.0 * self.frequency(s))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "entropy: {:.3} bits/symbol, context entropy: {:.3} bits/symbol",
            self.entropy(),
            self.context_entropy()
        )?;
        writeln!(f, "context counts (row = previous):")?;
        write!(f, "     ")?;
        for s in Symbol::TERMINALS {
            write!(f, "{:>6}", s)?;
        }
        writeln!(f)?;
        for (prev, row) in Symbol::TERMINALS.iter().zip(&self.contexts) {
            write!(f, "  {}  ", prev)?;
            for n in row {
                write!(f, "{:>6}", n)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "prefix code: {} bits ({:.3} bits/triangle)",
            self.prefix_code_bits(),
            self.bits_per_triangle()
        )
    }
}
