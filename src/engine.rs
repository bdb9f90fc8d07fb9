//! The knowledge base: chunking, embedding and nearest-neighbor retrieval over
//! ingested documents.
//!
//! The vector index and the chunk records are kept in one store behind a single
//! readers-writer lock, so the i-th vector always describes the i-th chunk. Ingests
//! take the write lock only to append; retrievals share the read lock.

use crate::chunking::{Chunk, RecursiveSplitter};
use crate::config::Settings;
use crate::embedding::{create_embedder, Embedder};
use crate::error::{Result, VoxragError};
use crate::vector_index::{FlatL2Index, VectorIndex};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// A retrieved chunk with its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Euclidean distance between the query and chunk embeddings.
    pub distance: f32,
}

/// Point-in-time sizes of the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of chunk records.
    pub chunks: usize,
    /// Number of vectors in the index.
    pub vectors: usize,
    /// Embedding dimension, unset before the first ingest.
    pub dimension: Option<usize>,
}

struct Store {
    index: Box<dyn VectorIndex>,
    chunks: Vec<Chunk>,
}

/// In-memory retrieval index over ingested documents.
pub struct KnowledgeBase {
    splitter: RecursiveSplitter,
    embedder: Arc<dyn Embedder>,
    store: Arc<RwLock<Store>>,
}

impl KnowledgeBase {
    /// Create a knowledge base from its components.
    ///
    /// `index` is expected to be empty; it grows only through [`KnowledgeBase::ingest`].
    pub fn new(
        splitter: RecursiveSplitter,
        embedder: Arc<dyn Embedder>,
        index: Box<dyn VectorIndex>,
    ) -> Self {
        Self {
            splitter,
            embedder,
            store: Arc::new(RwLock::new(Store {
                index,
                chunks: Vec::new(),
            })),
        }
    }

    /// Create a knowledge base with the configured splitter and embedder and an exact
    /// L2 index.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let splitter = RecursiveSplitter::new(settings.chunking.splitter_config())?;
        let embedder = create_embedder(&settings.embedding)?;
        Ok(Self::new(splitter, embedder, Box::new(FlatL2Index::new())))
    }

    pub fn splitter(&self) -> &RecursiveSplitter {
        &self.splitter
    }

    /// Split, embed and index a document. Returns the number of chunks added.
    ///
    /// Fails with [`VoxragError::EmptyDocument`] if the text yields no chunks. On any
    /// failure nothing is added.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn ingest(&self, text: &str, source: &str) -> Result<usize> {
        let splitter = self.splitter.clone();
        let owned = text.to_string();
        let pieces = tokio::task::spawn_blocking(move || splitter.split(&owned)).await?;

        if pieces.is_empty() {
            return Err(VoxragError::EmptyDocument);
        }

        let embeddings = self.embedder.embed_batch(&pieces).await?;
        if embeddings.len() != pieces.len() {
            return Err(VoxragError::Embedding(format!(
                "Expected {} embeddings, received {}",
                pieces.len(),
                embeddings.len()
            )));
        }

        let count = pieces.len();
        let total = {
            let mut store = self.store.write().await;
            // The index rejects the whole batch on error, so the chunk list is only
            // extended once the vectors are in.
            store.index.add(&embeddings)?;
            store
                .chunks
                .extend(pieces.into_iter().map(|text| Chunk::new(text, source)));
            store.chunks.len()
        };

        info!("Indexed {} chunks from {} ({} total)", count, source, total);
        Ok(count)
    }

    /// Retrieve up to `top_k` chunks closest to the query, closest first.
    ///
    /// An empty knowledge base yields an empty result, not an error.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Chunk>> {
        Ok(self
            .retrieve_scored(query, top_k)
            .await?
            .into_iter()
            .map(|scored| scored.chunk)
            .collect())
    }

    /// Like [`KnowledgeBase::retrieve`], keeping each chunk's distance.
    #[instrument(skip(self, query))]
    pub async fn retrieve_scored(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        if self.store.read().await.index.is_empty() {
            debug!("Knowledge base is empty");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let store = Arc::clone(&self.store);
        let results = tokio::task::spawn_blocking(move || -> Result<Vec<ScoredChunk>> {
            let store = store.blocking_read();
            let neighbors = store.index.search(&query_embedding, top_k)?;
            Ok(neighbors
                .into_iter()
                .filter_map(|n| {
                    store.chunks.get(n.position).map(|chunk| ScoredChunk {
                        chunk: chunk.clone(),
                        distance: n.distance,
                    })
                })
                .collect())
        })
        .await??;

        debug!("Retrieved {} chunks", results.len());
        Ok(results)
    }

    /// Current sizes of the chunk store and vector index.
    pub async fn stats(&self) -> IndexStats {
        let store = self.store.read().await;
        IndexStats {
            chunks: store.chunks.len(),
            vectors: store.index.len(),
            dimension: store.index.dimension(),
        }
    }
}
