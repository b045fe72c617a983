//! Immutable word stream with a read cursor.
//!
//! The decoded input bytes are held once in a [`HexStream`]; sections are
//! read through a [`WordCursor`] that only moves forward. Nothing is ever
//! removed from the buffer.

use serde::{Deserialize, Serialize};

use crate::hex::{self, CHARS_PER_WORD};
use crate::PacketError;

/// The raw input, decoded from hex into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexStream {
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl HexStream {
    /// Decodes `input` into a stream.
    ///
    /// The input must consist of whole words (a multiple of 4 hex characters).
    pub fn parse(input: &str) -> Result<Self, PacketError> {
        if input.len() % CHARS_PER_WORD != 0 {
            return Err(PacketError::malformed(
                format!(
                    "length {} is not a multiple of {} hex characters",
                    input.len(),
                    CHARS_PER_WORD
                ),
                input,
            ));
        }
        let bytes = hex::decode(input)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn words(&self) -> impl Iterator<Item = u16> + '_ {
        self.bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }

    /// Cursor positioned at byte offset `at`, which may lie past the end.
    pub fn cursor_at(&self, at: usize) -> WordCursor<'_> {
        WordCursor { stream: self, pos: at }
    }
}

/// Forward-only reader over a [`HexStream`].
#[derive(Debug, Clone, Copy)]
pub struct WordCursor<'a> {
    stream: &'a HexStream,
    pos: usize,
}

impl<'a> WordCursor<'a> {
    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_words(&self) -> usize {
        self.stream.bytes.len().saturating_sub(self.pos) / 2
    }

    /// Reads `n` words without moving the cursor.
    pub fn peek(&self, n: usize) -> Option<Vec<u16>> {
        let end = self.pos.checked_add(n * 2)?;
        let slice = self.stream.bytes.get(self.pos..end)?;
        Some(hex::to_words(slice))
    }

    /// Reads `n` words and moves past them.
    pub fn take(&mut self, n: usize) -> Option<Vec<u16>> {
        let words = self.peek(n)?;
        self.pos += n * 2;
        Some(words)
    }

    /// Moves forward to byte offset `at`. Never moves backwards.
    pub fn seek(&mut self, at: usize) {
        self.pos = self.pos.max(at);
    }

    /// Bytes not yet read.
    pub fn rest_bytes(&self) -> &'a [u8] {
        self.stream.bytes.get(self.pos..).unwrap_or(&[])
    }

    /// Reads every remaining word, leaving the cursor at the end.
    pub fn take_rest(&mut self) -> Vec<u16> {
        let words = hex::to_words(self.rest_bytes());
        self.pos = self.pos.max(self.stream.bytes.len());
        words
    }
}
