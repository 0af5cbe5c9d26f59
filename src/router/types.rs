use serde::{Deserialize, Serialize};

use crate::providers::ProviderError;

/// Response strategy chosen for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Answer from the loaded document context.
    Document,
    /// Phrasing / etiquette help, answered by the model.
    Style,
    /// Live web lookup.
    WebSearch,
    /// Plain model generation.
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Document => "document",
            Intent::Style => "style",
            Intent::WebSearch => "web_search",
            Intent::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reply was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyStatus {
    Answered,
    /// Search failed or came back empty; the model answered instead.
    SearchFallback { cause: Option<ProviderError> },
    /// Search results held nothing worth answering with.
    NoAnswer,
    /// Generation failed; the reply text is the apology message.
    Failed { cause: ProviderError },
}

impl ReplyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReplyStatus::Answered => "answered",
            ReplyStatus::SearchFallback { .. } => "search_fallback",
            ReplyStatus::NoAnswer => "no_answer",
            ReplyStatus::Failed { .. } => "failed",
        }
    }

    /// Provider error behind a degraded reply, if any.
    pub fn cause(&self) -> Option<&ProviderError> {
        match self {
            ReplyStatus::SearchFallback { cause } => cause.as_ref(),
            ReplyStatus::Failed { cause } => Some(cause),
            ReplyStatus::Answered | ReplyStatus::NoAnswer => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ReplyStatus::Failed { .. })
    }
}

impl std::fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of routing one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    pub status: ReplyStatus,
}

/// What the router will do for a question, decided before any provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePlan {
    Generate { intent: Intent, prompt: String },
    Search { query: String },
}

impl RoutePlan {
    pub fn intent(&self) -> Intent {
        match self {
            RoutePlan::Generate { intent, .. } => *intent,
            RoutePlan::Search { .. } => Intent::WebSearch,
        }
    }
}
