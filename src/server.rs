//! HTTP front end over the knowledge base.
//!
//! Accepts document uploads and text queries, and lets the operator replace the
//! assistant's system prompt at runtime.

use crate::chunking::Chunk;
use crate::document;
use crate::engine::KnowledgeBase;
use crate::error::VoxragError;
use crate::responder::{join_context, Responder};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Largest accepted request body.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    kb: KnowledgeBase,
    responder: Arc<dyn Responder>,
    system_prompt: RwLock<String>,
    top_k: usize,
}

impl AppState {
    pub fn new(
        kb: KnowledgeBase,
        responder: Arc<dyn Responder>,
        system_prompt: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            kb,
            responder,
            system_prompt: RwLock::new(system_prompt.into()),
            top_k,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub async fn system_prompt(&self) -> String {
        self.system_prompt.read().await.clone()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/set_prompt", post(set_prompt))
        .route("/upload", post(upload))
        .route("/voice", post(voice))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct PromptUpdate {
    prompt: String,
}

#[derive(Serialize)]
struct PromptResponse {
    status: &'static str,
    prompt: String,
}

#[derive(Serialize)]
struct UploadResponse {
    status: &'static str,
    chunks_indexed: usize,
}

#[derive(Deserialize)]
struct VoiceQuery {
    text: String,
}

#[derive(Serialize)]
struct VoiceResponse {
    reply: String,
    rag_sources: Vec<Chunk>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Client errors are reported as-is; anything else becomes a generic 500.
fn engine_error(err: VoxragError) -> Response {
    if err.is_client_error() {
        error_response(StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("Request failed: {}", err);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn set_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptUpdate>,
) -> impl IntoResponse {
    *state.system_prompt.write().await = req.prompt.clone();
    info!("System prompt updated ({} chars)", req.prompt.len());

    Json(PromptResponse {
        status: "success",
        prompt: req.prompt,
    })
}

async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or("upload.txt").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes));
                        break;
                    }
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'file' field");
    };

    let text = match document::extract_text(&filename, bytes.to_vec()).await {
        Ok(text) => text,
        Err(e) => return engine_error(e),
    };
    if text.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "File is empty or not readable. Please upload a valid text or PDF file.",
        );
    }

    match state.kb.ingest(&text, &filename).await {
        Ok(chunks_indexed) => Json(UploadResponse {
            status: "success",
            chunks_indexed,
        })
        .into_response(),
        Err(e) => engine_error(e),
    }
}

async fn voice(State(state): State<Arc<AppState>>, Form(req): Form<VoiceQuery>) -> Response {
    let sources = match state.kb.retrieve(&req.text, state.top_k).await {
        Ok(sources) => sources,
        Err(e) => return engine_error(e),
    };

    let context = join_context(sources.iter().map(|c| c.text.as_str()));
    let system_prompt = state.system_prompt().await;
    let reply = state
        .responder
        .generate_reply(&system_prompt, &context, &req.text)
        .await;

    Json(VoiceResponse {
        reply,
        rag_sources: sources,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_status() {
        let response = engine_error(VoxragError::EmptyDocument);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = engine_error(VoxragError::Pdf("bad xref".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = engine_error(VoxragError::Embedding("model down".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
