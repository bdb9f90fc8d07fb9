//! Recursive character splitting.
//!
//! Text is split on the coarsest separator it contains (paragraph, line, sentence, word)
//! and the resulting pieces are greedily merged back up to the chunk size. Pieces that
//! are still too long are split again with the finer separators, down to single
//! characters.

use super::SplitterConfig;
use crate::error::Result;
use std::collections::VecDeque;
use tracing::debug;

/// Splits documents into bounded, overlapping chunks.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    config: SplitterConfig,
}

impl RecursiveSplitter {
    /// Create a splitter, rejecting sizes that cannot make progress.
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Split text into chunks. Blank input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chunks = self.split_with(text, &self.config.separators);
        debug!(
            "Split {} chars into {} chunks",
            char_len(text),
            chunks.len()
        );
        chunks
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()))
            .unwrap_or(separators.len());
        let separator = separators.get(position).map(String::as_str).unwrap_or("");
        let finer = &separators[(position + 1).min(separators.len())..];

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keep_end(text, separator) {
            if char_len(piece) <= self.config.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }
            chunks.extend(self.split_with(piece, finer));
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily join pieces (each no longer than the chunk size) into chunks, carrying
    /// trailing pieces of each emitted chunk into the next one as overlap.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > size && !window.is_empty() {
                push_joined(&mut chunks, &window);

                while total > overlap || (total + len > size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        push_joined(&mut chunks, &window);
        chunks
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self {
            config: SplitterConfig::default(),
        }
    }
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split on `separator`, keeping it at the end of the piece it terminates.
/// An empty separator splits into single characters.
fn split_keep_end<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        let end = idx + separator.len();
        pieces.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
