//! HTTP gateway (Axum) over the [`FlashQuery`](crate::service::FlashQuery) facade.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    ask_handler, context_handler, evaluate_handler, hallucination_handler,
    knowledge_gap_handler, toxicity_handler,
};
pub use state::HandlerState;

use payload::WelcomeResponse;

/// Response header carrying the outcome label (`answered`, `failed`, `invalid_request`, ...).
pub const STATUS_HEADER: &str = "x-flashquery-status";

pub const WELCOME_MESSAGE: &str = "Welcome to FlashQuery! Use the frontend UI to interact.";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/context", post(context_handler))
        .route("/ask", post(ask_handler))
        .route("/evaluate", post(evaluate_handler))
        .route("/checks/toxicity", post(toxicity_handler))
        .route("/checks/hallucination", post(hallucination_handler))
        .route("/checks/knowledge-gap", post(knowledge_gap_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Timeout of a single [`check_health`] request.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// GETs `{base_url}/healthz`; true on a 2xx answer within [`HEALTH_CHECK_TIMEOUT`].
pub async fn check_health(base_url: &str) -> bool {
    let Ok(client) = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
    else {
        return false;
    };

    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    match client.get(&url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Health check request failed");
            false
        }
    }
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}
