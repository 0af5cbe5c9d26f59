//! The `FlashQuery` facade: routing, evaluation and safety checks behind one handle.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, ConfigError};
use crate::embedding::{
    CachedEmbedder, Embedder, EmbeddingError, SentenceConfig, SentenceEmbedder, TextClassifier,
    ToxicityClassifier, ToxicityConfig, ToxicityError,
};
use crate::evaluation::{
    DiagnosticSink, EvaluationResult, HybridEvaluator, PromptEvaluator, ReferenceDictionary,
    TracingSink,
};
use crate::metrics::MetricEngine;
use crate::providers::{
    DisabledSearch, GenaiGenerator, GenerationProvider, ProviderError, SearchProvider,
    SerpApiSearch,
};
use crate::router::{DocumentContext, Reply, RoutePlan, Router, Session};
use crate::safety::{KnowledgeGap, SafetyChecks, SafetyError, ToxicityVerdict};

/// Errors raised while assembling a [`FlashQuery`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Toxicity(#[from] ToxicityError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone)]
pub struct FlashQuery {
    router: Router,
    evaluator: HybridEvaluator,
    safety: SafetyChecks,
    references: Arc<ReferenceDictionary>,
    score_threshold: f64,
}

impl FlashQuery {
    /// Wires already-built components together.
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        search: Arc<dyn SearchProvider>,
        embedder: Arc<dyn Embedder>,
        classifier: Arc<dyn TextClassifier>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let evaluator = HybridEvaluator::new(
            MetricEngine::new(embedder.clone()),
            PromptEvaluator::new(sink),
        );

        Self {
            router: Router::new(generator, search),
            evaluator,
            safety: SafetyChecks::new(embedder, classifier),
            references: Arc::new(ReferenceDictionary::new()),
            score_threshold: crate::constants::DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Loads models, references and providers described by `config`.
    ///
    /// Missing model directories select the stub embedder/classifier; a missing
    /// SerpAPI key disables web search.
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let sentence = SentenceEmbedder::load(SentenceConfig::from_optional_dir(
            config.embedding_model_path.clone(),
        ))?;
        let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(sentence));

        let classifier: Arc<dyn TextClassifier> = Arc::new(ToxicityClassifier::load(
            ToxicityConfig::from_optional_dir(config.toxicity_model_path.clone()),
        )?);

        let generator: Arc<dyn GenerationProvider> = Arc::new(GenaiGenerator::new(
            config.generation_model.clone(),
            config.generation_timeout,
        ));

        let search: Arc<dyn SearchProvider> = match &config.serpapi_key {
            Some(key) => Arc::new(SerpApiSearch::new(
                key.clone(),
                config.search_results,
                config.search_timeout,
            )?),
            None => {
                info!("SERPAPI_API_KEY not set, web search disabled");
                Arc::new(DisabledSearch)
            }
        };

        let references = match &config.references_path {
            Some(path) => {
                let references = ReferenceDictionary::from_json_file(path)?;
                info!(path = %path.display(), entries = references.len(), "Loaded reference answers");
                references
            }
            None => ReferenceDictionary::new(),
        };

        Ok(Self::new(generator, search, embedder, classifier, Arc::new(TracingSink))
            .with_references(references)
            .with_score_threshold(config.score_threshold)
            .with_context_prefix_chars(config.context_prefix_chars))
    }

    pub fn with_references(mut self, references: ReferenceDictionary) -> Self {
        self.references = Arc::new(references);
        self
    }

    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_context_prefix_chars(mut self, chars: usize) -> Self {
        self.router = self.router.with_context_prefix_chars(chars);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn references(&self) -> &ReferenceDictionary {
        &self.references
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    /// Routes a question and records it in the session.
    pub async fn route(&self, session: &mut Session, question: &str, context: Option<&str>) -> Reply {
        self.router.route(session, question, context).await
    }

    /// First routing step; see [`Router::plan`].
    pub fn plan(&self, session: &mut Session, question: &str, context: Option<&str>) -> RoutePlan {
        self.router.plan(session, question, context)
    }

    /// Second routing step; see [`Router::execute`].
    pub async fn execute(&self, plan: RoutePlan) -> Reply {
        self.router.execute(plan).await
    }

    /// Replaces the session's document; blank text clears it.
    pub fn load_context<'s>(
        &self,
        session: &'s mut Session,
        text: &str,
    ) -> Option<&'s DocumentContext> {
        let id = session.id();
        let loaded = session.load_context(text);
        match loaded {
            Some(doc) => info!(session = %id, chars = doc.char_len(), "Document context loaded"),
            None => info!(session = %id, "Document context cleared"),
        }
        loaded
    }

    /// Hybrid evaluation. `references`/`threshold` default to the configured ones.
    pub fn evaluate(
        &self,
        response: &str,
        prompt: &str,
        references: Option<&ReferenceDictionary>,
        threshold: Option<f64>,
    ) -> EvaluationResult {
        self.evaluator.evaluate(
            response,
            prompt,
            references.unwrap_or(&self.references),
            threshold.unwrap_or(self.score_threshold),
        )
    }

    pub fn check_toxicity(&self, text: &str) -> Result<ToxicityVerdict, SafetyError> {
        self.safety.toxicity(text)
    }

    pub fn check_hallucination(&self, response: &str, reference: &str) -> Result<f64, SafetyError> {
        self.safety.hallucination_score(response, reference)
    }

    pub fn check_knowledge_gap(
        &self,
        response: &str,
        reference: &str,
    ) -> Result<KnowledgeGap, SafetyError> {
        self.safety.knowledge_gap(response, reference)
    }

    pub fn check_context_alignment(&self, response: &str, context: &str) -> Result<f64, SafetyError> {
        self.safety.context_alignment(response, context)
    }
}
