//! Error types for voxrag.

use thiserror::Error;

/// Library-level error type for voxrag operations.
#[derive(Error, Debug)]
pub enum VoxragError {
    #[error("Document produced no chunks to index")]
    EmptyDocument,

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl VoxragError {
    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VoxragError::EmptyDocument
                | VoxragError::InvalidArgument(_)
                | VoxragError::DimensionMismatch { .. }
                | VoxragError::Pdf(_)
        )
    }
}

impl From<tokio::task::JoinError> for VoxragError {
    fn from(err: tokio::task::JoinError) -> Self {
        VoxragError::Task(err.to_string())
    }
}

/// Result type alias for voxrag operations.
pub type Result<T> = std::result::Result<T, VoxragError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(VoxragError::EmptyDocument.is_client_error());
        assert!(VoxragError::InvalidArgument("k".to_string()).is_client_error());
        assert!(VoxragError::DimensionMismatch { expected: 3, actual: 2 }.is_client_error());
        assert!(!VoxragError::Embedding("boom".to_string()).is_client_error());
        assert!(VoxragError::Pdf("no pages".to_string()).is_client_error());
        assert!(!VoxragError::Config("bad".to_string()).is_client_error());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = VoxragError::DimensionMismatch { expected: 384, actual: 10 };
        assert_eq!(err.to_string(), "Dimension mismatch: index expects 384, got 10");
    }
}
