//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{Result, VoxragError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI has a limit on inputs per request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with default settings.
    pub fn new() -> Self {
        Self::with_config("text-embedding-3-small", 1536)
    }

    /// Create a new OpenAI embedder with custom model and dimensions.
    pub fn with_config(model: &str, dimensions: usize) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            dimensions,
        }
    }
}

impl Default for OpenAIEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(VoxragError::Embedding(
                "Cannot embed an empty batch".to_string(),
            ));
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| VoxragError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                VoxragError::Embedding(format!("Embedding API error: {}", e))
            })?;

            // The API does not guarantee response order
            let mut embeddings = response.data;
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        if all_embeddings.len() != texts.len() {
            return Err(VoxragError::Embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                all_embeddings.len()
            )));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new();
        assert_eq!(embedder.dimensions(), 1536);

        let embedder = OpenAIEmbedder::with_config("text-embedding-3-large", 3072);
        assert_eq!(embedder.dimensions(), 3072);
    }

    #[tokio::test]
    async fn test_empty_batch_fails_without_request() {
        let embedder = OpenAIEmbedder::new();
        assert!(matches!(
            embedder.embed_batch(&[]).await,
            Err(VoxragError::Embedding(_))
        ));
    }
}
