//! Document chunking for the knowledge base.
//!
//! Splits raw document text into bounded, overlapping chunks ready for embedding.

mod recursive;

pub use recursive::RecursiveSplitter;

use crate::error::{Result, VoxragError};
use serde::{Deserialize, Serialize};

/// A chunk of an ingested document.
///
/// Chunks are immutable once indexed; their creation order is their position in the
/// knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Identifier of the originating document (usually a filename).
    pub source: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// Configuration for recursive splitting.
///
/// Sizes are measured in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Maximum number of characters carried over from the previous chunk.
    pub chunk_overlap: usize,
    /// Boundaries to split on, coarsest first. The empty string means a per-character cut.
    pub separators: Vec<String>,
}

impl SplitterConfig {
    /// Create a config with the default separator hierarchy.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    /// Check that the sizes describe a splitter that can make progress.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(VoxragError::InvalidArgument(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(VoxragError::InvalidArgument(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            separators: ["\n\n", "\n", ". ", " ", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
