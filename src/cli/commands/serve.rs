//! Serve command: runs the HTTP API.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::engine::KnowledgeBase;
use crate::responder::OpenAIResponder;
use crate::server::{router, AppState};
use std::sync::Arc;
use tracing::warn;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if std::env::var("OPENAI_API_KEY").is_err() {
        warn!("OPENAI_API_KEY is not set; /voice replies will report an error");
    }

    let kb = KnowledgeBase::from_settings(&settings)?;
    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
    let responder = Arc::new(OpenAIResponder::from_settings(&settings.llm).with_prompts(prompts));

    let state = Arc::new(AppState::new(
        kb,
        responder,
        settings.llm.system_prompt.clone(),
        settings.retrieval.top_k,
    ));
    let app = router(state);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("voxrag API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Set prompt", "POST /set_prompt");
    Output::kv("Upload", "POST /upload");
    Output::kv("Voice query", "POST /voice");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
