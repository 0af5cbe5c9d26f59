//! External generation and web-search providers.
//!
//! The router only sees the [`GenerationProvider`] and [`SearchProvider`] traits.
//! Production implementations are [`GenaiGenerator`] and [`SerpApiSearch`]; scripted
//! mocks are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod error;
pub mod generation;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod search;


pub use error::ProviderError;
pub use generation::GenaiGenerator;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockGenerator, MockSearch};
pub use search::{DisabledSearch, SERPAPI_ENDPOINT, SerpApiSearch};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns a prompt into answer text.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Looks a query up on the web.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError>;
}

/// Raw search output: a single answer or a list of snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResult {
    Text(String),
    List(Vec<String>),
}

impl SearchResult {
    /// True when there is nothing to condense.
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResult::Text(text) => text.trim().is_empty(),
            SearchResult::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Single string view; list items are joined with spaces.
    pub fn flatten(&self) -> String {
        match self {
            SearchResult::Text(text) => text.clone(),
            SearchResult::List(items) => items.join(" "),
        }
    }
}
