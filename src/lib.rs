//! # pzhuff
//!
//! Deterministic Huffman coding over byte streams: frequency counting,
//! tree construction by repeated minimum-merge, prefix-code generation,
//! and bit-level encode/decode.
//!
//! ```
//! let corpus = b"aaaabbbcc";
//! let tree = pzhuff::build_tree(corpus)?;
//! let bits = pzhuff::encode(&tree, b"abc")?;
//! assert_eq!(bits.to_text(), "01110");
//! assert_eq!(pzhuff::decode(&tree, &bits)?, b"abc");
//! # Ok::<(), pzhuff::HuffError>(())
//! ```
//!
//! The encoded [`BitStream`] carries no header: decoding requires the same
//! tree (or the same frequency table, see [`HuffmanTree::frequency_table`]).

pub mod bitstream;
pub mod codes;
pub mod frequency;
pub mod huffman;
pub mod pqueue;

#[cfg(test)]
mod validation;

pub use bitstream::BitStream;
pub use codes::{Code, CodeTable};
pub use frequency::{FrequencyEntry, FrequencyTable, SymbolOrder};
pub use huffman::{BuildOptions, Decoder, HuffNode, HuffmanTree, NodeId, Traverse, Visit};

use thiserror::Error;

/// Error types for pzhuff operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HuffError {
    /// The corpus contains no symbols.
    #[error("empty input: no symbols to build a tree from")]
    EmptyInput,
    /// A tree-construction precondition was violated.
    #[error("cannot build huffman tree: {0}")]
    Build(&'static str),
    /// A byte to encode has no code in the table.
    #[error("unknown symbol 0x{symbol:02x} at offset {offset}")]
    UnknownSymbol { symbol: u8, offset: usize },
    /// A textual bit stream contained something other than `0` or `1`.
    #[error("invalid bit {found:?} at position {position}")]
    InvalidBit { found: char, position: usize },
    /// The stream ended partway through a code.
    #[error("truncated stream: {pending} trailing bit(s) do not complete a code")]
    TruncatedStream { pending: usize },
    /// The bit at `position` has no matching branch in the tree.
    #[error("no code matches bit at position {position}")]
    InvalidCode { position: usize },
    /// A packed stream claims more bits than its bytes can hold.
    #[error("bit length {bits} exceeds buffer capacity of {capacity} bits")]
    BitLength { bits: usize, capacity: usize },
}

pub type HuffResult<T> = Result<T, HuffError>;

/// Count `corpus` and build its Huffman tree with default options.
pub fn build_tree(corpus: &[u8]) -> HuffResult<HuffmanTree> {
    HuffmanTree::from_data(corpus)
}

/// Encode `data` with the codes of `tree`.
pub fn encode(tree: &HuffmanTree, data: &[u8]) -> HuffResult<BitStream> {
    tree.encode(data)
}

/// Decode `bits` by walking `tree`.
pub fn decode(tree: &HuffmanTree, bits: &BitStream) -> HuffResult<Vec<u8>> {
    tree.decode(bits)
}

/// In-order walk over `tree`, see [`HuffmanTree::traverse`].
pub fn traverse(tree: &HuffmanTree) -> Traverse<'_> {
    tree.traverse()
}
