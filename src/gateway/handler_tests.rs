use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use super::*;
use crate::constants::{APOLOGY_MESSAGE, DEFAULT_CONTEXT_PREFIX_CHARS};
use crate::embedding::{SentenceEmbedder, ToxicityClassifier};
use crate::evaluation::TracingSink;
use crate::providers::{MockGenerator, MockSearch, ProviderError};
use crate::service::FlashQuery;

struct Harness {
    state: HandlerState,
    generator: Arc<MockGenerator>,
    search: Arc<MockSearch>,
}

impl Harness {
    fn new(generator: MockGenerator, search: MockSearch) -> Self {
        let generator = Arc::new(generator);
        let search = Arc::new(search);
        let service = FlashQuery::new(
            generator.clone(),
            search.clone(),
            Arc::new(SentenceEmbedder::stub()),
            Arc::new(ToxicityClassifier::stub()),
            Arc::new(TracingSink),
        );
        Self {
            state: HandlerState::new(service, DEFAULT_CONTEXT_PREFIX_CHARS),
            generator,
            search,
        }
    }

    fn app(&self) -> Router {
        create_router_with_state(self.state.clone())
    }
}

fn default_harness() -> Harness {
    Harness::new(
        MockGenerator::replying("model answer"),
        MockSearch::text("Search engines index the web for people every single day."),
    )
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    };

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, headers, json)
}

#[tokio::test]
async fn test_root_and_health() {
    let harness = default_harness();

    let (status, _, body) = send(harness.app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], WELCOME_MESSAGE);

    let (status, headers, body) = send(harness.app(), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(headers[STATUS_HEADER], "healthy");
}

#[tokio::test]
async fn test_context_returns_preview() {
    let harness = default_harness();
    let text = format!("  {}  ", "a".repeat(2000));

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/context",
        Some(serde_json::json!({ "text": text })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["preview"].as_str().map(|p| p.chars().count()),
        Some(1500)
    );
    assert!(harness.state.session.lock().has_context());
}

#[tokio::test]
async fn test_blank_context_is_rejected() {
    let harness = default_harness();
    let (status, headers, body) = send(
        harness.app(),
        "POST",
        "/context",
        Some(serde_json::json!({ "text": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[STATUS_HEADER], "invalid_request");
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_ask_uses_loaded_context() {
    let harness = default_harness();

    send(
        harness.app(),
        "POST",
        "/context",
        Some(serde_json::json!({ "text": "Quarterly revenue was 10M." })),
    )
    .await;

    let (status, headers, body) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "question": "What was the revenue in the PDF?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "document");
    assert_eq!(body["status"], "answered");
    assert_eq!(body["answer"], "model answer");
    assert_eq!(headers[STATUS_HEADER], "answered");
    assert!(harness.generator.prompts()[0].starts_with("Quarterly revenue was 10M.\n\nQuestion: "));
    assert_eq!(harness.state.session.lock().history().len(), 1);
}

#[tokio::test]
async fn test_ask_with_inline_context() {
    let harness = default_harness();

    let (_, _, body) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({
            "question": "Summarize this document",
            "context": "Inline document body."
        })),
    )
    .await;

    assert_eq!(body["intent"], "document");
    assert!(harness.generator.prompts()[0].starts_with("Inline document body."));
}

#[tokio::test]
async fn test_ask_web_search() {
    let harness = default_harness();

    let (_, _, body) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "question": "What is the latest search engine news?" })),
    )
    .await;

    assert_eq!(body["intent"], "web_search");
    assert_eq!(body["status"], "answered");
    assert!(body["answer"].as_str().unwrap_or_default().ends_with("✅"));
    assert_eq!(harness.search.call_count(), 1);
    assert_eq!(harness.generator.call_count(), 0);
}

#[tokio::test]
async fn test_ask_search_failure_reports_detail() {
    let harness = Harness::new(
        MockGenerator::replying("fallback answer"),
        MockSearch::failing(ProviderError::NotConfigured { provider: "serpapi" }),
    );

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "question": "Who is the mayor of Paris?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "fallback");
    assert_eq!(body["status"], "search_fallback");
    assert_eq!(body["answer"], "fallback answer");
    assert_eq!(body["detail"], "serpapi is not configured");
}

#[tokio::test]
async fn test_ask_generation_failure() {
    let harness = Harness::new(MockGenerator::failing(), MockSearch::text("unused"));

    let (status, headers, body) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "question": "Write a haiku about rain" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], APOLOGY_MESSAGE);
    assert_eq!(body["status"], "failed");
    assert_eq!(headers[STATUS_HEADER], "failed");
}

#[tokio::test]
async fn test_ask_rejects_blank_question() {
    let harness = default_harness();
    let (status, _, _) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "question": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(harness.generator.call_count(), 0);
}

#[tokio::test]
async fn test_ask_rejects_malformed_body() {
    let harness = default_harness();
    let (status, _, _) = send(
        harness.app(),
        "POST",
        "/ask",
        Some(serde_json::json!({ "prompt": "wrong field" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_evaluate_with_request_references() {
    let harness = default_harness();
    let prompt = "Explain the ownership model of Rust programs";
    let reference = "Every value in Rust programs has a single owner.";

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/evaluate",
        Some(serde_json::json!({
            "response": reference,
            "prompt": prompt,
            "references": { prompt: reference }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flagged"], false);
    assert!(body["hybrid_score"].as_f64().unwrap_or_default() > 0.99);
}

#[tokio::test]
async fn test_evaluate_without_reference_is_flagged() {
    let harness = default_harness();

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/evaluate",
        Some(serde_json::json!({ "response": "Short.", "prompt": "Why?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flagged"], true);
    assert_eq!(body["prompt_eval"]["quality_check"], false);
    assert_eq!(body["hybrid_score"], 0.0);
}

#[tokio::test]
async fn test_evaluate_rejects_bad_threshold() {
    let harness = default_harness();
    let (status, _, _) = send(
        harness.app(),
        "POST",
        "/evaluate",
        Some(serde_json::json!({ "response": "r", "prompt": "p", "threshold": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toxicity_endpoint() {
    let harness = default_harness();

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/checks/toxicity",
        Some(serde_json::json!({ "text": "you are a stupid idiot" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flagged"], true);

    let (_, _, body) = send(
        harness.app(),
        "POST",
        "/checks/toxicity",
        Some(serde_json::json!({ "text": "thanks for your help" })),
    )
    .await;
    assert_eq!(body["flagged"], false);
}

#[tokio::test]
async fn test_hallucination_endpoint() {
    let harness = default_harness();

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/checks/hallucination",
        Some(serde_json::json!({ "response": "", "reference": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 0.0);

    let (_, _, body) = send(
        harness.app(),
        "POST",
        "/checks/hallucination",
        Some(serde_json::json!({ "response": "same words", "reference": "same words" })),
    )
    .await;
    assert_eq!(body["score"], 1.0);
}

#[tokio::test]
async fn test_knowledge_gap_endpoint() {
    let harness = default_harness();

    let (status, _, body) = send(
        harness.app(),
        "POST",
        "/checks/knowledge-gap",
        Some(serde_json::json!({ "response": "rust ownership", "reference": "rust ownership" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passed"], true);
}

#[tokio::test]
async fn test_gateway_error_response_shape() {
    use axum::response::IntoResponse;

    let response = GatewayError::InternalError("boom".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[STATUS_HEADER], "internal_error");

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["error"], "internal error: boom");
    assert_eq!(body["code"], 500);
}
