//! HTTP client helpers for tests.

use flashquery::evaluation::EvaluationResult;
use flashquery::gateway::STATUS_HEADER;
use flashquery::gateway::payload::{AskResponse, ContextResponse, ScoreResponse};
use flashquery::safety::ToxicityVerdict;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<reqwest::Response, TestClientError> {
        let resp = self.client.post(self.url(path)).json(&body).send().await?;

        match resp.status().as_u16() {
            200 => Ok(resp),
            400 | 422 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn load_context(&self, text: &str) -> Result<ContextResponse, TestClientError> {
        let resp = self.post("/context", json!({ "text": text })).await?;
        Ok(resp.json().await?)
    }

    /// Returns the reply and the value of the status header.
    pub async fn ask(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> Result<(AskResponse, String), TestClientError> {
        let resp = self
            .post("/ask", json!({ "question": question, "context": context }))
            .await?;

        let status_header = resp
            .headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok((resp.json().await?, status_header))
    }

    pub async fn evaluate(&self, body: Value) -> Result<EvaluationResult, TestClientError> {
        let resp = self.post("/evaluate", body).await?;
        Ok(resp.json().await?)
    }

    pub async fn toxicity(&self, text: &str) -> Result<ToxicityVerdict, TestClientError> {
        let resp = self.post("/checks/toxicity", json!({ "text": text })).await?;
        Ok(resp.json().await?)
    }

    pub async fn hallucination(
        &self,
        response: &str,
        reference: &str,
    ) -> Result<ScoreResponse, TestClientError> {
        let resp = self
            .post(
                "/checks/hallucination",
                json!({ "response": response, "reference": reference }),
            )
            .await?;
        Ok(resp.json().await?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
