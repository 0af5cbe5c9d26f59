use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{GenerationProvider, ProviderError, SearchProvider, SearchResult};

/// Scripted generator that records every prompt it receives.
///
/// Queued outcomes are returned first; afterwards every call returns the default reply.
#[derive(Debug)]
pub struct MockGenerator {
    default_reply: Result<String, ProviderError>,
    queued: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::replying("mock answer")
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            default_reply: Ok(reply.into()),
            queued: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            default_reply: Err(ProviderError::Request {
                provider: "mock-generation",
                reason: "scripted failure".to_string(),
            }),
            queued: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: Result<String, ProviderError>) {
        self.queued.lock().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerationProvider for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        let queued = self.queued.lock().pop_front();
        queued.unwrap_or_else(|| self.default_reply.clone())
    }
}

/// Scripted search provider that records every query.
#[derive(Debug)]
pub struct MockSearch {
    outcome: Result<SearchResult, ProviderError>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn returning(result: SearchResult) -> Self {
        Self {
            outcome: Ok(result),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::returning(SearchResult::Text(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError> {
        self.queries.lock().push(query.to_string());
        self.outcome.clone()
    }
}
