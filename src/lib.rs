//! voxrag - knowledge base retrieval for a voice assistant
//!
//! An in-memory retrieval-augmented-generation index: documents are split into
//! overlapping chunks, embedded into a fixed-dimension vector space and searched by
//! Euclidean distance. A thin HTTP front end accepts uploads and text queries and hands
//! the retrieved passages to a language model for the spoken reply.
//!
//! # Architecture
//!
//! - `document` - Text and PDF extraction for uploads
//! - `chunking` - Recursive document splitting
//! - `embedding` - Embedding generation (local feature hashing, OpenAI)
//! - `vector_index` - Append-only nearest-neighbor index
//! - `engine` - The knowledge base tying the three together
//! - `responder` - Reply generation from retrieved context
//! - `server` - HTTP routes
//! - `config` - Settings and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use voxrag::config::Settings;
//! use voxrag::engine::KnowledgeBase;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let kb = KnowledgeBase::from_settings(&Settings::default())?;
//!
//!     let count = kb.ingest("Paris is the capital of France.", "facts.txt").await?;
//!     println!("Indexed {} chunks", count);
//!
//!     for chunk in kb.retrieve("What is the capital of France?", 3).await? {
//!         println!("{}: {}", chunk.source, chunk.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod openai;
pub mod responder;
pub mod server;
pub mod vector_index;

pub use error::{Result, VoxragError};
