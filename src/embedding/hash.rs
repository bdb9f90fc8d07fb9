//! Local feature-hashing embedder.
//!
//! Maps word unigrams and bigrams into a fixed number of signed buckets and
//! L2-normalizes the result. Needs no model download or network access and is stable
//! across processes, which makes it the default for the in-memory knowledge base.

use super::Embedder;
use crate::error::{Result, VoxragError};
use async_trait::async_trait;
use regex::Regex;
use std::hash::Hasher;
use tracing::{debug, instrument};
use twox_hash::XxHash64;

const HASH_SEED: u64 = 0x766f_7872_6167;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
    token_pattern: Regex,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(VoxragError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        let token_pattern = Regex::new(r"\w+")
            .map_err(|e| VoxragError::Config(format!("Invalid token pattern: {}", e)))?;

        Ok(Self {
            dimensions,
            token_pattern,
        })
    }

    /// Embed one text synchronously.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut vector = vec![0.0f32; self.dimensions];

        for token in &tokens {
            self.accumulate(&mut vector, &[token.as_bytes()], 1.0);
        }
        for pair in tokens.windows(2) {
            self.accumulate(
                &mut vector,
                &[pair[0].as_bytes(), b" ", pair[1].as_bytes()],
                BIGRAM_WEIGHT,
            );
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        vector
    }

    fn accumulate(&self, vector: &mut [f32], parts: &[&[u8]], weight: f32) {
        let mut hasher = XxHash64::with_seed(HASH_SEED);
        for part in parts {
            hasher.write(part);
        }
        let hash = hasher.finish();

        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(VoxragError::Embedding(
                "Cannot embed an empty batch".to_string(),
            ));
        }

        let embedder = self.clone();
        let texts = texts.to_vec();
        let embeddings = tokio::task::spawn_blocking(move || {
            texts
                .iter()
                .map(|text| embedder.embed_sync(text))
                .collect::<Vec<_>>()
        })
        .await?;

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
