//! Fixed-size sliding window over a transcript.

use super::{ChunkSpan, ChunkingConfig};
use crate::error::Result;

/// Iterator over overlapping character windows of a text.
///
/// Windows start at `0, step, 2 * step, ...` while the start is inside the
/// text; each window ends at `min(start + chunk_size, len)`.
pub struct SlidingWindow<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()` as the final entry.
    boundaries: Vec<usize>,
    start: usize,
    chunk_size: usize,
    step: usize,
}

impl<'a> SlidingWindow<'a> {
    /// Create a window iterator, validating the configuration first.
    pub fn new(text: &'a str, config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;

        let boundaries = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        Ok(Self {
            text,
            boundaries,
            start: 0,
            chunk_size: config.chunk_size,
            step: config.step(),
        })
    }

    /// Length of the text in characters.
    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }
}

impl Iterator for SlidingWindow<'_> {
    type Item = ChunkSpan;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.char_len();
        if self.start >= len {
            return None;
        }

        let start = self.start;
        let end = start.saturating_add(self.chunk_size).min(len);
        let text = self.text[self.boundaries[start]..self.boundaries[end]].to_string();

        self.start = start.saturating_add(self.step);

        Some(ChunkSpan { start, end, text })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.char_len();
        let remaining = if self.start >= len {
            0
        } else {
            (len - self.start).div_ceil(self.step)
        };
        (remaining, Some(remaining))
    }
}
