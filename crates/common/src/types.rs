use rust_decimal::Decimal;
use std::fmt;

use super::error::Error;

const CHAR_BITS: u32 = 21;
const CHAR_MASK: u64 = (1 << CHAR_BITS) - 1;

/// Compact, injective identifier of a 3-character currency ticker.
///
/// The three `char` scalar values are packed into one `u64`, 21 bits each,
/// so every 3-character string maps to a distinct id and the ticker text can
/// be recovered from the id alone.
///
/// Example:
/// ```text
/// "EUR" -> ('E' << 42) | ('U' << 21) | 'R'
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickerId(u64);

impl TickerId {
    /// Computes the id of `ticker`.
    ///
    /// # Errors
    /// Returns `Error::InvalidTickerFormat` if `ticker` is not exactly 3 characters.
    pub fn parse(ticker: &str) -> Result<Self, Error> {
        let mut chars = ticker.chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c), None) => Ok(Self::pack([a, b, c])),
            _ => Err(Error::InvalidTickerFormat(ticker.to_string())),
        }
    }

    fn pack(chars: [char; 3]) -> Self {
        TickerId(
            chars
                .iter()
                .fold(0u64, |packed, &c| (packed << CHAR_BITS) | c as u64),
        )
    }

    /// Recovers the three characters of the ticker.
    pub fn chars(&self) -> [char; 3] {
        let mut out = [char::REPLACEMENT_CHARACTER; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            let shift = CHAR_BITS * (2 - i as u32);
            let code = ((self.0 >> shift) & CHAR_MASK) as u32;
            if let Some(c) = char::from_u32(code) {
                *slot = c;
            }
        }
        out
    }

    pub fn is_alphabetic(&self) -> bool {
        self.chars().iter().all(|c| c.is_alphabetic())
    }
}

impl fmt::Display for TickerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c] = self.chars();
        write!(f, "{}{}{}", a, b, c)
    }
}

/// Directed exchange edge stored in a vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeEdge {
    pub target: usize,
    /// Units of the target currency per unit of the owning vertex's currency.
    pub rate: Decimal,
}

/// One step of a conversion path: `from -> to` at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from: usize,
    pub to: usize,
    pub rate: Decimal,
}

/// A conversion path in source -> target order.
///
/// An empty path means the source already is the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionPath {
    pub hops: Vec<Hop>,
}

impl ConversionPath {
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Edge rates in the order they are applied to the notional.
    pub fn rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.hops.iter().map(|hop| hop.rate)
    }

    /// Vertex ids visited from source to target, both included.
    pub fn vertices(&self, source: usize) -> Vec<usize> {
        let mut vertices = Vec::with_capacity(self.hops.len() + 1);
        vertices.push(source);
        vertices.extend(self.hops.iter().map(|hop| hop.to));
        vertices
    }
}

/// What to convert: `notional` units of `source` into `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: usize,
    pub target: usize,
    pub notional: Decimal,
}

/// Decimal places kept when rounding each hop's rate and the final amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    pub rate_scale: u32,
    pub output_scale: u32,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy {
            rate_scale: 4,
            output_scale: 0,
        }
    }
}
