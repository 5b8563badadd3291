//! Huffman coding: tree construction, encoding, and decoding.
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`].
//! Leaves are seeded in [`SymbolOrder`] and merged through a stable
//! min-heap, so the same frequency table always yields the same tree.
use std::fmt;

use log::{debug, trace};

use crate::bitstream::BitStream;
use crate::codes::{Code, CodeTable};
use crate::frequency::{self, FrequencyTable, SymbolOrder};
use crate::pqueue::MinHeap;
use crate::{HuffError, HuffResult};

/// Index of a node in a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    /// A single symbol and its occurrence count.
    Leaf { symbol: u8, weight: u64 },
    /// A merge of two subtrees; `weight` is the sum of both children.
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// The symbol of a leaf; `None` for internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }
}

/// Options for tree construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Order in which leaves enter the priority queue; this is the
    /// tie-break between equal weights.
    pub order: SymbolOrder,
}

/// A Huffman tree for encoding and decoding byte streams.
///
/// Immutable once built. Encoding uses the cached code table, decoding walks
/// the tree directly.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    /// Leaves first, in seeding order, then internal nodes in merge order.
    nodes: Vec<HuffNode>,
    root: NodeId,
    codes: CodeTable,
    leaf_count: usize,
}

impl HuffmanTree {
    /// Build a Huffman tree from input data.
    ///
    /// Computes byte frequencies, builds the tree via a min-heap priority
    /// queue, and generates the code table.
    pub fn from_data(input: &[u8]) -> HuffResult<Self> {
        Self::from_data_with(input, BuildOptions::default())
    }

    pub fn from_data_with(input: &[u8], options: BuildOptions) -> HuffResult<Self> {
        let freq = frequency::get_frequency(input)?;
        Self::from_frequency_table_with(&freq, options)
    }

    /// Build a Huffman tree from a pre-computed frequency table.
    pub fn from_frequency_table(freq: &FrequencyTable) -> HuffResult<Self> {
        Self::from_frequency_table_with(freq, BuildOptions::default())
    }

    pub fn from_frequency_table_with(
        freq: &FrequencyTable,
        options: BuildOptions,
    ) -> HuffResult<Self> {
        if freq.is_empty() {
            return Err(HuffError::Build("frequency table is empty"));
        }

        let leaf_count = freq.used();
        let mut nodes: Vec<HuffNode> = Vec::with_capacity(2 * leaf_count - 1);
        let mut heap: MinHeap<NodeId> = MinHeap::with_capacity(leaf_count);
        for entry in freq.entries(options.order) {
            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Leaf {
                symbol: entry.symbol,
                weight: entry.count,
            });
            heap.push(entry.count, id);
        }

        // Merge the two lightest nodes until one remains. The first pop
        // becomes the left child.
        while heap.len() > 1 {
            let (left_weight, left_seq, left) = heap
                .pop_entry()
                .ok_or(HuffError::Build("priority queue underflow"))?;
            let (right_weight, right_seq, right) = heap
                .pop_entry()
                .ok_or(HuffError::Build("priority queue underflow"))?;

            let weight = left_weight
                .checked_add(right_weight)
                .ok_or(HuffError::Build("combined weight overflows u64"))?;
            trace!(
                "merge: {}#{} + {}#{} -> {}",
                left_weight,
                left_seq,
                right_weight,
                right_seq,
                weight
            );

            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Internal {
                weight,
                left,
                right,
            });
            heap.push(weight, id);
        }

        let root = heap
            .pop()
            .ok_or(HuffError::Build("priority queue underflow"))?;

        let mut tree = HuffmanTree {
            nodes,
            root,
            codes: CodeTable::default(),
            leaf_count,
        };
        tree.codes = CodeTable::from_tree(&tree)?;

        debug!(
            "built huffman tree: {} symbols, total weight {}, {} nodes, max code length {}",
            tree.leaf_count,
            tree.weight(),
            tree.nodes.len(),
            tree.codes.max_len()
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.0]
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Root weight, equal to the number of symbols in the source corpus.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.codes
    }

    /// Get the code for a given byte value.
    pub fn get_code(&self, symbol: u8) -> Option<Code> {
        self.codes.get(symbol)
    }

    pub fn max_code_len(&self) -> u8 {
        self.codes.max_len()
    }

    /// Recover the frequency table this tree was built from.
    ///
    /// Leaves are listed in seeding order, so building from the returned
    /// table with default options reproduces this tree exactly.
    pub fn frequency_table(&self) -> HuffResult<FrequencyTable> {
        FrequencyTable::from_entries(self.nodes.iter().filter_map(|node| match node {
            HuffNode::Leaf { symbol, weight } => Some((*symbol, *weight)),
            HuffNode::Internal { .. } => None,
        }))
    }

    /// Number of bits needed to encode a corpus with the given counts.
    ///
    /// Returns `None` if `freq` contains a symbol this tree cannot encode,
    /// or if the bit count overflows `u64`.
    pub fn encoded_bits(&self, freq: &FrequencyTable) -> Option<u64> {
        freq.entries(SymbolOrder::ByteValue).try_fold(0u64, |bits, e| {
            let code = self.get_code(e.symbol)?;
            bits.checked_add(e.count.checked_mul(code.len() as u64)?)
        })
    }

    /// Encode input bytes using this Huffman tree.
    pub fn encode(&self, input: &[u8]) -> HuffResult<BitStream> {
        let bits = self.codes.encode(input)?;
        debug!("encoded {} bytes into {} bits", input.len(), bits.len());
        Ok(bits)
    }

    /// Decode a bitstream back to the original bytes.
    pub fn decode(&self, bits: &BitStream) -> HuffResult<Vec<u8>> {
        let min_len = self.codes.iter().map(|(_, c)| c.len()).min().unwrap_or(1);
        let mut output = Vec::with_capacity(bits.len() / min_len.max(1) as usize);
        self.decode_into(bits.iter(), &mut output)?;
        debug!("decoded {} bits into {} bytes", bits.len(), output.len());
        Ok(output)
    }

    /// Decode a textual bit string of `'0'`/`'1'` characters.
    ///
    /// The whole string is validated before any bit is walked.
    pub fn decode_text(&self, text: &str) -> HuffResult<Vec<u8>> {
        let bits = BitStream::parse_text(text)?;
        self.decode(&bits)
    }

    /// Decode from any source of bits.
    pub fn decode_bits<I>(&self, bits: I) -> HuffResult<Vec<u8>>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut output = Vec::new();
        self.decode_into(bits, &mut output)?;
        Ok(output)
    }

    fn decode_into<I>(&self, bits: I, output: &mut Vec<u8>) -> HuffResult<()>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut decoder = Decoder::new(self);
        for bit in bits {
            if let Some(symbol) = decoder.push_bit(bit)? {
                output.push(symbol);
            }
        }
        decoder.finish()
    }

    /// Lazy in-order walk over every node.
    ///
    /// Each call starts a fresh walk from the root.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            tree: self,
            pending: Vec::new(),
            descend: Some((self.root, 0)),
        }
    }

    /// `(symbol, weight)` for each leaf, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.traverse()
            .filter_map(|visit| visit.symbol.map(|s| (s, visit.weight)))
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            HuffNode::Leaf { symbol, weight } => {
                let code = self
                    .get_code(*symbol)
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                writeln!(
                    f,
                    "{indent}{label} leaf {:?} (0x{symbol:02x}) weight={weight} code={code}",
                    *symbol as char
                )
            }
            HuffNode::Internal {
                weight,
                left,
                right,
            } => {
                writeln!(f, "{indent}{label} internal weight={weight}")?;
                self.fmt_node(f, *left, depth + 1, "0")?;
                self.fmt_node(f, *right, depth + 1, "1")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0, "root")
    }
}

/// Bit-at-a-time decoding state machine.
///
/// Starts at the root; `0` moves to the left child, `1` to the right. When
/// the new node is a leaf its symbol is emitted and the state returns to the
/// root. A tree whose root is a leaf treats a single `0` as its code.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    tree: &'t HuffmanTree,
    state: NodeId,
    /// Bits consumed since the last emitted symbol.
    pending: usize,
    /// Bits consumed in total.
    position: usize,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Decoder {
            tree,
            state: tree.root,
            pending: 0,
            position: 0,
        }
    }

    /// Feed one bit; returns the symbol it completes, if any.
    ///
    /// On error the decoder state is unchanged.
    pub fn push_bit(&mut self, bit: bool) -> HuffResult<Option<u8>> {
        let next = match self.tree.node(self.state) {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    *left
                }
            }
            HuffNode::Leaf { symbol, .. } => {
                if bit {
                    return Err(HuffError::InvalidCode {
                        position: self.position,
                    });
                }
                self.position += 1;
                return Ok(Some(*symbol));
            }
        };
        self.position += 1;

        match self.tree.node(next) {
            HuffNode::Leaf { symbol, .. } => {
                self.state = self.tree.root;
                self.pending = 0;
                Ok(Some(*symbol))
            }
            HuffNode::Internal { .. } => {
                self.state = next;
                self.pending += 1;
                Ok(None)
            }
        }
    }

    pub fn is_at_root(&self) -> bool {
        self.state == self.tree.root
    }

    /// Total bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Signal end of input.
    ///
    /// Fails with [`HuffError::TruncatedStream`] if the last bits did not
    /// complete a code.
    pub fn finish(self) -> HuffResult<()> {
        if self.is_at_root() {
            Ok(())
        } else {
            Err(HuffError::TruncatedStream {
                pending: self.pending,
            })
        }
    }
}

/// One node visited by [`Traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Leaf symbol; `None` for internal nodes.
    pub symbol: Option<u8>,
    pub weight: u64,
    /// Distance from the root.
    pub depth: usize,
}

/// In-order iterator over a [`HuffmanTree`]: left subtree, node, right
/// subtree.
#[derive(Debug, Clone)]
pub struct Traverse<'t> {
    tree: &'t HuffmanTree,
    /// Internal nodes whose left subtree is being walked:
    /// `(weight, right child, depth)`.
    pending: Vec<(u64, NodeId, usize)>,
    descend: Option<(NodeId, usize)>,
}

impl Iterator for Traverse<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        while let Some((id, depth)) = self.descend.take() {
            match self.tree.node(id) {
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    self.pending.push((*weight, *right, depth));
                    self.descend = Some((*left, depth + 1));
                }
                HuffNode::Leaf { symbol, weight } => {
                    return Some(Visit {
                        symbol: Some(*symbol),
                        weight: *weight,
                        depth,
                    });
                }
            }
        }

        let (weight, right, depth) = self.pending.pop()?;
        self.descend = Some((right, depth + 1));
        Some(Visit {
            symbol: None,
            weight,
            depth,
        })
    }
}
