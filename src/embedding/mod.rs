//! Embedding generation for semantic search and retrieval.

mod hash;
mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::EmbeddingSettings;
use crate::error::{Result, VoxragError};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
///
/// Implementations must be deterministic for a fixed model: the same text always maps
/// to the same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| VoxragError::Embedding("Empty embedding response".to_string()))
    }

    /// Generate embeddings for multiple texts, one per input and in input order.
    ///
    /// Fails with [`VoxragError::Embedding`] on an empty batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Create an embedder for the configured provider.
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    let dimensions = settings.dimensions as usize;
    match settings.provider.to_lowercase().as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(dimensions)?)),
        "openai" => Ok(Arc::new(OpenAIEmbedder::with_config(
            &settings.model,
            dimensions,
        ))),
        other => Err(VoxragError::Config(format!(
            "Unknown embedding provider: {}",
            other
        ))),
    }
}
