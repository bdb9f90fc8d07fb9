//! Integration tests for the HTTP handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use voxrag::chunking::{RecursiveSplitter, SplitterConfig};
use voxrag::embedding::HashEmbedder;
use voxrag::engine::KnowledgeBase;
use voxrag::responder::Responder;
use voxrag::server::{router, AppState};
use voxrag::vector_index::FlatL2Index;

const BOUNDARY: &str = "voxrag-test-boundary";

/// Responder that echoes what it was given instead of calling a model.
struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn generate_reply(&self, system_prompt: &str, context: &str, query: &str) -> String {
        format!("{}|{}|{}", system_prompt, context, query)
    }
}

fn create_state() -> Arc<AppState> {
    let splitter = RecursiveSplitter::new(SplitterConfig::new(40, 0)).unwrap();
    let kb = KnowledgeBase::new(
        splitter,
        Arc::new(HashEmbedder::new(384).unwrap()),
        Box::new(FlatL2Index::new()),
    );
    Arc::new(AppState::new(kb, Arc::new(EchoResponder), "Be concise.", 1))
}

fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn voice_request(text: &str) -> Request<Body> {
    let encoded = text.replace(' ', "+").replace('?', "%3F");

    Request::builder()
        .method("POST")
        .uri("/voice")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("text={}", encoded)))
        .unwrap()
}

/// Build a minimal one-page PDF showing `text` in Helvetica.
fn single_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(
        format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
    );
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}

/// Helper to get response body as JSON.
async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = router(create_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["status"], "ok");
}

#[tokio::test]
async fn test_upload_then_voice() {
    let state = create_state();

    let response = router(state.clone())
        .oneshot(upload_request(
            "facts.txt",
            b"The cat sat. The dog ran. Paris is the capital of France.",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["chunks_indexed"], 2);

    let response = router(state)
        .oneshot(voice_request("What is the capital of France?"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    let sources = json["rag_sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["source"], "facts.txt");
    assert_eq!(sources[0]["text"], "Paris is the capital of France.");
    assert_eq!(
        json["reply"],
        "Be concise.|Paris is the capital of France.|What is the capital of France?"
    );
}

#[tokio::test]
async fn test_voice_without_documents() {
    let response = router(create_state())
        .oneshot(voice_request("Anyone there?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert!(json["rag_sources"].as_array().unwrap().is_empty());
    assert_eq!(json["reply"], "Be concise.||Anyone there?");
}

#[tokio::test]
async fn test_blank_upload_is_rejected() {
    let state = create_state();
    let response = router(state.clone())
        .oneshot(upload_request("blank.txt", b"  \n\n  "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.knowledge_base().stats().await.chunks, 0);
}

#[tokio::test]
async fn test_pdf_upload_is_indexed() {
    let state = create_state();
    let response = router(state.clone())
        .oneshot(upload_request(
            "facts.PDF",
            &single_page_pdf("Paris is the capital of France."),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert!(json["chunks_indexed"].as_u64().unwrap() >= 1);

    let results = state
        .knowledge_base()
        .retrieve("capital of France", 1)
        .await
        .unwrap();
    assert!(results[0].text.contains("Paris"));
    assert_eq!(results[0].source, "facts.PDF");
}

#[tokio::test]
async fn test_unreadable_pdf_is_rejected() {
    let state = create_state();
    let response = router(state.clone())
        .oneshot(upload_request("report.pdf", b"%PDF-1.7 truncated"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Error reading PDF"));
    assert_eq!(state.knowledge_base().stats().await.chunks, 0);
}

#[tokio::test]
async fn test_invalid_utf8_is_tolerated() {
    let state = create_state();
    let response = router(state.clone())
        .oneshot(upload_request("notes.txt", b"caf\xff notes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let results = state.knowledge_base().retrieve("notes", 1).await.unwrap();
    assert_eq!(results[0].text, "caf notes");
}

#[tokio::test]
async fn test_set_prompt() {
    let state = create_state();

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/set_prompt")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"prompt":"Answer in French."}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["prompt"], "Answer in French.");
    assert_eq!(state.system_prompt().await, "Answer in French.");
}
