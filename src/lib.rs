//! FlashQuery library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Routing
//! - [`Router`], [`Session`], [`Intent`], [`Reply`] - Question classification and dispatch
//! - [`condense`] - Search output reduction
//!
//! ## Evaluation
//! - [`HybridEvaluator`], [`EvaluationResult`] - Semantic + lexical scoring
//! - [`PromptEvaluator`], [`PromptEvaluation`] - Rule, adherence and quality checks
//! - [`ReferenceDictionary`] - Prompt to reference answer lookup
//!
//! ## Models
//! - [`SentenceEmbedder`], [`CachedEmbedder`] - Sentence embeddings
//! - [`ToxicityClassifier`] - Toxicity scoring
//!
//! ## Providers
//! - [`GenaiGenerator`] - LLM generation
//! - [`SerpApiSearch`] - Web search
//!
//! ## Test/Mock Support
//! Mock providers and a recording diagnostic sink are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluation;
pub mod gateway;
pub mod metrics;
pub mod providers;
pub mod router;
pub mod safety;
pub mod service;
pub mod text;

pub use config::{Config, ConfigError};
pub use constants::{
    APOLOGY_MESSAGE, DEFAULT_CONTEXT_PREFIX_CHARS, DEFAULT_SCORE_THRESHOLD,
    KNOWLEDGE_GAP_THRESHOLD, NO_ANSWER_MARKER, SUCCESS_MARKER, TOXICITY_THRESHOLD, round3,
};
pub use embedding::{
    CachedEmbedder, Embedder, EmbeddingError, LabelScore, SentenceConfig, SentenceEmbedder,
    TextClassifier, ToxicityClassifier, ToxicityConfig, ToxicityError, cosine_similarity,
};
#[cfg(any(test, feature = "mock"))]
pub use evaluation::RecordingSink;
pub use evaluation::{
    DiagnosticSink, EvaluationResult, HybridEvaluator, PromptEvaluation, PromptEvaluator,
    ReferenceDictionary, RuleCheck, TracingSink, adherence_check, quality_check,
    rule_based_eval, sequence_ratio,
};
pub use metrics::{LexicalScores, MetricEngine, rouge_l, sentence_bleu, token_f1};
#[cfg(any(test, feature = "mock"))]
pub use providers::{MockGenerator, MockSearch};
pub use providers::{
    DisabledSearch, GenaiGenerator, GenerationProvider, ProviderError, SearchProvider,
    SearchResult, SerpApiSearch,
};
pub use router::{
    DocumentContext, Intent, IntentRules, Reply, ReplyStatus, RoutePlan, Router, Session, Turn,
    condense, condense_text,
};
pub use safety::{KnowledgeGap, SafetyChecks, SafetyError, ToxicityVerdict};
pub use service::{BuildError, FlashQuery};
