//! Configuration module for voxrag.
//!
//! Handles loading application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, LlmSettings, PromptSettings,
    RetrievalSettings, ServerSettings, Settings,
};
