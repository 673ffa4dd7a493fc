//! This crate provides the bit-level storage backing the quadtree traversal
//! code: [`BitSink`], an append-only writer, and [`BitCursor`], a forward-only
//! reader over its words.
//!
//! Bits are packed LSB-first into little-endian `u32` words: bit `i` of the
//! logical stream is bit `i % 32` of word `i / 32`. This layout is part of the
//! on-disk format.

mod error;

pub use error::{Error, Result};

/// Append-only LSB-first bit writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSink {
    words: Vec<u32>,
    len: u32,
}

impl BitSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct a sink from backing words and an exact bit count.
    pub fn from_words(words: Vec<u32>, len: u32) -> Result<Self> {
        if words.len() as u64 * 32 < len as u64 {
            return Err(Error::LengthMismatch {
                bits: len,
                words: words.len(),
            });
        }
        Ok(Self { words, len })
    }

    /// Number of bits written so far.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing words; the final word is zero-padded past `len` bits.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Discard all bits.
    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    /// Append a single bit.
    #[inline]
    pub fn push(&mut self, bit: bool) {
        let word_index = (self.len / 32) as usize;
        if word_index == self.words.len() {
            self.words.push(0);
        }
        if bit {
            self.words[word_index] |= 1u32 << (self.len % 32);
        }
        self.len += 1;
    }

    /// Append every bit of `other`, preserving order.
    pub fn append(&mut self, other: &BitSink) {
        let mut cursor = other.cursor();
        while let Ok(bit) = cursor.read_bit() {
            self.push(bit);
        }
    }

    /// Create a reader positioned at the first bit.
    #[inline]
    pub fn cursor(&self) -> BitCursor<'_> {
        BitCursor {
            words: &self.words,
            len: self.len,
            pos: 0,
        }
    }
}

/// Forward-only bit reader over a [`BitSink`]'s words.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    words: &'a [u32],
    len: u32,
    pos: u32,
}

impl BitCursor<'_> {
    /// Consume and return the next bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.pos >= self.len {
            return Err(Error::OutOfBits);
        }
        let word = self.words[(self.pos / 32) as usize];
        let bit = word & (1u32 << (self.pos % 32)) != 0;
        self.pos += 1;
        Ok(bit)
    }

    /// Current cursor position in bits.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Number of unread bits.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.len - self.pos
    }
}
