//! Transcript chunking.
//!
//! Splits a transcript into fixed-size, overlapping character windows. Offsets
//! are counted in `char`s so a window never cuts through a UTF-8 sequence.

mod window;

pub use window::SlidingWindow;

use crate::error::{Result, VidqaError};
use serde::{Deserialize, Serialize};

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default number of characters shared by consecutive windows.
pub const DEFAULT_OVERLAP: usize = 100;

/// A chunk of transcript text with its character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// Start offset (inclusive), in characters.
    pub start: usize,
    /// End offset (exclusive), in characters.
    pub end: usize,
    /// Text of the chunk.
    pub text: String,
}

impl ChunkSpan {
    /// Length of this chunk in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    /// Create a new chunking configuration.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    /// Reject parameters whose cursor would never advance.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(VidqaError::InvalidChunking {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }

    /// Distance between the start offsets of consecutive windows.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Split `text` into overlapping windows, keeping their offsets.
pub fn chunk_spans(text: &str, config: &ChunkingConfig) -> Result<Vec<ChunkSpan>> {
    Ok(SlidingWindow::new(text, config)?.collect())
}

/// Split `text` into overlapping windows of `chunk_size` characters.
///
/// Empty text yields no chunks; text shorter than `chunk_size` yields exactly
/// one chunk; the last chunk may be shorter than `chunk_size`.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    Ok(SlidingWindow::new(text, config)?
        .map(|span| span.text)
        .collect())
}
