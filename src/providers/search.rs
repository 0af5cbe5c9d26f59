use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ProviderError, SearchProvider, SearchResult};

const PROVIDER: &str = "serpapi";

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

/// Google results through SerpAPI.
///
/// The direct answer box wins, then the knowledge-graph description, then the organic
/// result snippets.
pub struct SerpApiSearch {
    http: Client,
    endpoint: String,
    api_key: String,
    num_results: u32,
    timeout: Duration,
}

impl std::fmt::Debug for SerpApiSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiSearch")
            .field("endpoint", &self.endpoint)
            .field("num_results", &self.num_results)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Default, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    snippet_highlighted_words: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KnowledgeGraph {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    snippet: Option<String>,
}

impl SerpApiSearch {
    pub fn new(
        api_key: impl Into<String>,
        num_results: u32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: SERPAPI_ENDPOINT.to_string(),
            api_key: api_key.into(),
            num_results,
            timeout,
        })
    }

    /// Points the client at another host (a local stub server in tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError> {
        debug!(query_len = query.len(), "Querying SerpAPI");

        let num = self.num_results.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
                ("hl", "en"),
                ("gl", "us"),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "SerpAPI request failed");
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: PROVIDER,
                        after: self.timeout,
                    }
                } else {
                    ProviderError::Request {
                        provider: PROVIDER,
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: SerpResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER,
                    reason: e.to_string(),
                })?;

        extract_result(body)
    }
}

fn extract_result(body: SerpResponse) -> Result<SearchResult, ProviderError> {
    if let Some(error) = body.error {
        return Err(ProviderError::InvalidResponse {
            provider: PROVIDER,
            reason: error,
        });
    }

    if let Some(answer_box) = body.answer_box {
        if let Some(answer) = answer_box.answer.filter(|a| !a.trim().is_empty()) {
            return Ok(SearchResult::Text(answer));
        }
        if let Some(snippet) = answer_box.snippet.filter(|s| !s.trim().is_empty()) {
            return Ok(SearchResult::Text(snippet));
        }
        if !answer_box.snippet_highlighted_words.is_empty() {
            return Ok(SearchResult::List(answer_box.snippet_highlighted_words));
        }
    }

    if let Some(description) = body
        .knowledge_graph
        .and_then(|kg| kg.description)
        .filter(|d| !d.trim().is_empty())
    {
        return Ok(SearchResult::Text(description));
    }

    let snippets: Vec<String> = body
        .organic_results
        .into_iter()
        .filter_map(|r| r.snippet)
        .filter(|s| !s.trim().is_empty())
        .collect();

    if snippets.is_empty() {
        return Err(ProviderError::Empty { provider: PROVIDER });
    }

    Ok(SearchResult::List(snippets))
}

/// Used when no search key is configured; every query fails with `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSearch;

#[async_trait]
impl SearchProvider for DisabledSearch {
    async fn search(&self, _query: &str) -> Result<SearchResult, ProviderError> {
        Err(ProviderError::NotConfigured { provider: PROVIDER })
    }
}
