//! OpenAI client construction shared by the embedder and the responder.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;
use tracing::warn;

/// Default timeout for OpenAI API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with the default timeout.
///
/// Credentials come from `OPENAI_API_KEY`, as read by `OpenAIConfig::default`.
pub fn create_client() -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
