//! Question routing.
//!
//! A question is classified by an ordered [`IntentRules`] table (document, style, web
//! search, fallback) and answered by the matching strategy. Routing is split into a
//! synchronous [`Router::plan`] step that reads the [`Session`] and an async
//! [`Router::execute`] step that calls providers, so callers holding the session behind
//! a lock never keep it across an await.

pub mod condense;
pub mod rules;
pub mod session;
pub mod types;


pub use condense::{condense, condense_text};
pub use rules::{IntentRule, IntentRules, Matcher};
pub use session::{DocumentContext, Session, Turn};
pub use types::{Intent, Reply, ReplyStatus, RoutePlan};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::constants::{APOLOGY_MESSAGE, DEFAULT_CONTEXT_PREFIX_CHARS, NO_ANSWER_MARKER};
use crate::providers::{GenerationProvider, ProviderError, SearchProvider};

/// Builds the document-grounded prompt.
pub fn augmented_prompt(context: &DocumentContext, question: &str, max_chars: usize) -> String {
    format!("{}\n\nQuestion: {}", context.prefix(max_chars), question)
}

#[derive(Clone)]
pub struct Router {
    rules: IntentRules,
    generator: Arc<dyn GenerationProvider>,
    search: Arc<dyn SearchProvider>,
    context_prefix_chars: usize,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("rules", &self.rules.rules().len())
            .field("context_prefix_chars", &self.context_prefix_chars)
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(generator: Arc<dyn GenerationProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            rules: IntentRules::default(),
            generator,
            search,
            context_prefix_chars: DEFAULT_CONTEXT_PREFIX_CHARS,
        }
    }

    pub fn with_rules(mut self, rules: IntentRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_context_prefix_chars(mut self, chars: usize) -> Self {
        self.context_prefix_chars = chars;
        self
    }

    pub fn rules(&self) -> &IntentRules {
        &self.rules
    }

    /// Applies a request-supplied context, classifies, and decides the action.
    ///
    /// A non-empty `context` replaces the session's document (trimmed, so whitespace
    /// clears it).
    pub fn plan(&self, session: &mut Session, question: &str, context: Option<&str>) -> RoutePlan {
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            session.load_context(context);
        }

        let intent = self.rules.classify(question, session.has_context());
        debug!(intent = %intent, has_context = session.has_context(), "Question classified");

        match intent {
            Intent::WebSearch => RoutePlan::Search {
                query: question.to_string(),
            },
            Intent::Document => match session.context() {
                Some(doc) => RoutePlan::Generate {
                    intent,
                    prompt: augmented_prompt(doc, question, self.context_prefix_chars),
                },
                // Custom tables may match documents without requiring a loaded context.
                None => RoutePlan::Generate {
                    intent: Intent::Fallback,
                    prompt: question.to_string(),
                },
            },
            intent => RoutePlan::Generate {
                intent,
                prompt: question.to_string(),
            },
        }
    }

    /// Runs a plan against the providers. Provider failures become reply statuses.
    pub async fn execute(&self, plan: RoutePlan) -> Reply {
        match plan {
            RoutePlan::Generate { intent, prompt } => self.generate(intent, &prompt).await,
            RoutePlan::Search { query } => self.search_then_condense(&query).await,
        }
    }

    /// Plans, executes, and records the turn in the session history.
    pub async fn route(
        &self,
        session: &mut Session,
        question: &str,
        context: Option<&str>,
    ) -> Reply {
        let plan = self.plan(session, question, context);
        let reply = self.execute(plan).await;
        session.record(question, &reply);
        reply
    }

    async fn generate(&self, intent: Intent, prompt: &str) -> Reply {
        info!(intent = %intent, prompt_len = prompt.len(), "Generating answer");

        match self.generator.generate(prompt).await {
            Ok(text) => Reply {
                intent,
                text: text.trim().to_string(),
                status: ReplyStatus::Answered,
            },
            Err(cause) => {
                warn!(intent = %intent, error = %cause, "Generation failed, replying with apology");
                Reply {
                    intent,
                    text: APOLOGY_MESSAGE.to_string(),
                    status: ReplyStatus::Failed { cause },
                }
            }
        }
    }

    async fn search_then_condense(&self, query: &str) -> Reply {
        let cause = match self.search.search(query).await {
            Ok(result) if !result.is_empty() => {
                let text = condense(&result, query);
                let status = if text == NO_ANSWER_MARKER {
                    ReplyStatus::NoAnswer
                } else {
                    ReplyStatus::Answered
                };
                info!(status = %status, "Answered from web search");
                return Reply {
                    intent: Intent::WebSearch,
                    text,
                    status,
                };
            }
            Ok(_) => {
                debug!("Search returned nothing, falling back to generation");
                None
            }
            Err(e) => {
                warn!(error = %e, "Search failed, falling back to generation");
                Some(e)
            }
        };

        self.fallback_after_search(query, cause).await
    }

    async fn fallback_after_search(&self, query: &str, cause: Option<ProviderError>) -> Reply {
        let mut reply = self.generate(Intent::Fallback, query).await;
        if reply.status == ReplyStatus::Answered {
            reply.status = ReplyStatus::SearchFallback { cause };
        }
        reply
    }
}
