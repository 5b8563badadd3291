//! Packed bit sequences.
//!
//! Bits are stored MSB-first within each byte. The exact bit length is kept
//! alongside the bytes because the last byte may carry padding; padding bits
//! are always zero.

use std::fmt;
use std::str::FromStr;

use crate::codes::Code;
use crate::{HuffError, HuffResult};

/// An ordered sequence of bits, independent of byte boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        BitStream {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Reassemble a stream from packed bytes and its bit length.
    ///
    /// Padding bits past `len` are cleared so that equal bit sequences
    /// compare equal.
    pub fn from_parts(mut bytes: Vec<u8>, len: usize) -> HuffResult<Self> {
        let capacity = bytes.len().saturating_mul(8);
        if len > capacity {
            return Err(HuffError::BitLength {
                bits: len,
                capacity,
            });
        }
        bytes.truncate(len.div_ceil(8));
        let tail = len % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }
        Ok(BitStream { bytes, len })
    }

    /// Parse a textual bit string made of `'0'` and `'1'` characters.
    ///
    /// Any other character, whitespace included, is rejected with
    /// [`HuffError::InvalidBit`] carrying its character position.
    pub fn parse_text(text: &str) -> HuffResult<Self> {
        let mut stream = BitStream::with_capacity(text.len());
        for (position, ch) in text.chars().enumerate() {
            match ch {
                '0' => stream.push_bit(false),
                '1' => stream.push_bit(true),
                found => return Err(HuffError::InvalidBit { found, position }),
            }
        }
        Ok(stream)
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the final byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.bytes, self.len)
    }

    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        let bit_offset = self.len % 8;
        if bit_offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - bit_offset);
        }
        self.len += 1;
    }

    /// Append every bit of `code`, most significant first.
    pub fn push_code(&mut self, code: Code) {
        for bit in code.bits() {
            self.push_bit(bit);
        }
    }

    /// Bit at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> Bits<'_> {
        Bits {
            stream: self,
            pos: 0,
        }
    }

    /// Render as a string of `'0'`/`'1'` characters.
    pub fn to_text(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for BitStream {
    type Err = HuffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl Extend<bool> for BitStream {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push_bit(bit);
        }
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut stream = BitStream::new();
        stream.extend(iter);
        stream
    }
}

/// Iterator over the bits of a [`BitStream`].
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    stream: &'a BitStream,
    pos: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.stream.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stream.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl<'a> IntoIterator for &'a BitStream {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Bits<'a> {
        self.iter()
    }
}
