//! Prefix-code tables derived from a Huffman tree.
//!
//! Codes come from root-to-leaf paths: descending left appends `0`,
//! descending right appends `1`. Because every code ends at a distinct leaf
//! of a single tree, no code can be a prefix of another.

use std::fmt;

use crate::bitstream::BitStream;
use crate::huffman::{HuffNode, HuffmanTree, NodeId};
use crate::{HuffError, HuffResult};

/// Longest code word a [`Code`] can hold.
///
/// Weights are `u64`, and a leaf at depth `d` requires a total weight of at
/// least the (d+2)th Fibonacci number, so real trees stay well below this.
pub const MAX_CODE_BITS: u8 = 128;

/// A single code word, stored right-aligned in `word`, MSB emitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    word: u128,
    len: u8,
}

impl Code {
    pub fn new(word: u128, len: u8) -> Self {
        debug_assert!(len <= MAX_CODE_BITS);
        debug_assert!(len == MAX_CODE_BITS || word >> len == 0);
        Code { word, len }
    }

    pub fn word(&self) -> u128 {
        self.word
    }

    /// Number of bits in the code.
    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits of the code, most significant first.
    pub fn bits(self) -> impl DoubleEndedIterator<Item = bool> + ExactSizeIterator {
        (0..self.len).rev().map(move |i| (self.word >> i) & 1 == 1)
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        other.word >> (other.len - self.len) == self.word
    }

    fn child(self, bit: bool) -> HuffResult<Code> {
        if self.len >= MAX_CODE_BITS {
            return Err(HuffError::Build("code length exceeds 128 bits"));
        }
        Ok(Code {
            word: (self.word << 1) | bit as u128,
            len: self.len + 1,
        })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to code word for every leaf of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    /// Indexed by byte value; `None` for symbols absent from the tree.
    lookup: [Option<Code>; 256],
    used: usize,
}

impl CodeTable {
    /// Derive codes by depth-first traversal of `tree`.
    ///
    /// A tree whose root is itself a leaf (single-symbol corpus) assigns that
    /// symbol the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> HuffResult<Self> {
        let mut table = CodeTable::default();
        match tree.node(tree.root()) {
            HuffNode::Leaf { symbol, .. } => table.insert(*symbol, Code::new(0, 1)),
            HuffNode::Internal { .. } => {
                table.assign(tree, tree.root(), Code::new(0, 0))?;
            }
        }
        Ok(table)
    }

    fn assign(&mut self, tree: &HuffmanTree, id: NodeId, prefix: Code) -> HuffResult<()> {
        match tree.node(id) {
            HuffNode::Leaf { symbol, .. } => self.insert(*symbol, prefix),
            HuffNode::Internal { left, right, .. } => {
                self.assign(tree, *left, prefix.child(false)?)?;
                self.assign(tree, *right, prefix.child(true)?)?;
            }
        }
        Ok(())
    }

    fn insert(&mut self, symbol: u8, code: Code) {
        let slot = &mut self.lookup[symbol as usize];
        if slot.is_none() {
            self.used += 1;
        }
        *slot = Some(code);
    }

    /// Code for `symbol`, if the symbol is in the table.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.lookup[symbol as usize]
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.lookup
            .iter()
            .enumerate()
            .filter_map(|(i, code)| code.map(|c| (i as u8, c)))
    }

    /// Longest code length in the table (0 if empty).
    pub fn max_len(&self) -> u8 {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Check that no code is a prefix of another code.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            if a.is_empty() {
                return false;
            }
            for b in &codes[i + 1..] {
                if a.is_prefix_of(b) || b.is_prefix_of(a) {
                    return false;
                }
            }
        }
        true
    }

    /// Encode `data` into a fresh bitstream.
    pub fn encode(&self, data: &[u8]) -> HuffResult<BitStream> {
        let mut total_bits = 0usize;
        for (offset, &symbol) in data.iter().enumerate() {
            let code = self
                .get(symbol)
                .ok_or(HuffError::UnknownSymbol { symbol, offset })?;
            total_bits += code.len() as usize;
        }
        let mut out = BitStream::with_capacity(total_bits);
        self.encode_into(data, &mut out)?;
        Ok(out)
    }

    /// Append the encoding of `data` to `out`.
    ///
    /// On error `out` is left unchanged.
    pub fn encode_into(&self, data: &[u8], out: &mut BitStream) -> HuffResult<()> {
        if let Some((offset, &symbol)) = data
            .iter()
            .enumerate()
            .find(|(_, &s)| self.get(s).is_none())
        {
            return Err(HuffError::UnknownSymbol { symbol, offset });
        }
        for &symbol in data {
            if let Some(code) = self.get(symbol) {
                out.push_code(code);
            }
        }
        Ok(())
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable {
            lookup: [None; 256],
            used: 0,
        }
    }
}
