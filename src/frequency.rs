//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) in an input buffer,
//! remembers the order in which distinct symbols first appeared, and
//! computes Shannon entropy.

use crate::{HuffError, HuffResult};

/// One present symbol and its occurrence count. `count` is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: u8,
    pub count: u64,
}

/// Order in which distinct symbols are seeded into the tree builder.
///
/// The seeding order is the tie-break sequence for equal weights, so two
/// tables with the same counts but different orders may build different
/// (equally optimal) trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolOrder {
    /// Order of first appearance in the counted input.
    #[default]
    FirstOccurrence,
    /// Ascending byte value.
    ByteValue,
}

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    byte: [u64; 256],
    /// Sum of all counts.
    total: u64,
    /// Distinct symbols, in the order they were first seen.
    seen: Vec<u8>,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; 256],
            total: 0,
            seen: Vec::new(),
        }
    }

    /// Count byte frequencies in the input buffer.
    ///
    /// Accumulates into the existing counts, so a corpus can be fed in
    /// several slices. First-occurrence order carries over between calls.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            let slot = &mut self.byte[b as usize];
            if *slot == 0 {
                self.seen.push(b);
            }
            *slot += 1;
        }
        self.total += input.len() as u64;
    }

    /// Rebuild a table from `(symbol, count)` pairs.
    ///
    /// Zero counts are skipped and repeated symbols accumulate. Pair order
    /// becomes the first-occurrence order. Fails with [`HuffError::Build`]
    /// if a symbol count or the total would overflow `u64`.
    pub fn from_entries<I>(entries: I) -> HuffResult<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (symbol, count) in entries {
            table.add(symbol, count)?;
        }
        Ok(table)
    }

    fn add(&mut self, symbol: u8, count: u64) -> HuffResult<()> {
        if count == 0 {
            return Ok(());
        }
        let current = self.byte[symbol as usize];
        let updated = current
            .checked_add(count)
            .ok_or(HuffError::Build("symbol count overflows u64"))?;
        let total = self
            .total
            .checked_add(count)
            .ok_or(HuffError::Build("total count overflows u64"))?;
        if current == 0 {
            self.seen.push(symbol);
        }
        self.byte[symbol as usize] = updated;
        self.total = total;
        Ok(())
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct byte values with nonzero count.
    pub fn used(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Present symbols with their counts, in the requested order.
    pub fn entries(&self, order: SymbolOrder) -> impl Iterator<Item = FrequencyEntry> + '_ {
        let symbols: Vec<u8> = match order {
            SymbolOrder::FirstOccurrence => self.seen.clone(),
            SymbolOrder::ByteValue => {
                let mut sorted = self.seen.clone();
                sorted.sort_unstable();
                sorted
            }
        };
        symbols.into_iter().map(move |symbol| FrequencyEntry {
            symbol,
            count: self.byte[symbol as usize],
        })
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
///
/// Fails with [`HuffError::EmptyInput`] when `input` holds no symbols, since
/// an empty table cannot seed tree construction.
pub fn get_frequency(input: &[u8]) -> HuffResult<FrequencyTable> {
    if input.is_empty() {
        return Err(HuffError::EmptyInput);
    }
    let mut table = FrequencyTable::new();
    table.count(input);
    Ok(table)
}
