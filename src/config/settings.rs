//! Configuration settings for voxrag.

use crate::chunking::SplitterConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub llm: LlmSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Document chunking settings. Sizes are in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Overlap carried between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl ChunkingSettings {
    /// Splitter configuration with the default separator hierarchy.
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig::new(self.chunk_size, self.chunk_overlap)
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (hash, openai).
    pub provider: String,
    /// Embedding model to use (openai provider only).
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 384,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks returned per query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Reply generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model used for replies.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Initial system prompt; replaceable at runtime through the HTTP API.
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            system_prompt: "You are a real-time conversational AI voice assistant. Speak naturally and concisely. Use KB context first when available. Do not hallucinate.".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VoxragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voxrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 50);
        assert_eq!(settings.embedding.provider, "hash");
        assert_eq!(settings.retrieval.top_k, 3);
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = 120\n\n[retrieval]\ntop_k = 5\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.chunking.chunk_size, 120);
        assert_eq!(settings.chunking.chunk_overlap, 50);
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.embedding.dimensions, 384);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.llm.model = "gpt-4.1".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.llm.model, "gpt-4.1");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking\nchunk_size = ").unwrap();
        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
