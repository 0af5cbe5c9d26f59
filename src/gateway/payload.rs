use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::router::{Intent, Reply};

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextResponse {
    pub message: String,
    pub preview: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub intent: Intent,
    pub status: String,
    /// Provider error behind a degraded reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<Reply> for AskResponse {
    fn from(reply: Reply) -> Self {
        Self {
            status: reply.status.label().to_string(),
            detail: reply.status.cause().map(|c| c.to_string()),
            intent: reply.intent,
            answer: reply.text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub response: String,
    pub prompt: String,
    /// Overrides the configured reference answers for this request.
    #[serde(default)]
    pub references: Option<HashMap<String, String>>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    pub response: String,
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
}
