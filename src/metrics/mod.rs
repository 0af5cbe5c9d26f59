//! Lexical and semantic answer metrics.
//!
//! Lexical metrics ([`sentence_bleu`], [`rouge_l`], [`token_f1`]) are pure functions.
//! Semantic similarity needs an [`Embedder`] and lives on [`MetricEngine`].

mod bleu;
mod overlap;
mod rouge;


pub use bleu::{MAX_ORDER, SMOOTHING_EPSILON, sentence_bleu};
pub use overlap::token_f1;
pub use rouge::rouge_l;

use std::sync::Arc;

use tracing::warn;

use crate::embedding::{Embedder, embedding_similarity};

/// Lexical scores of a response against one reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LexicalScores {
    pub bleu: f64,
    pub rouge_l: f64,
    pub f1: f64,
}

impl LexicalScores {
    pub fn compute(response: &str, reference: &str) -> Self {
        Self {
            bleu: sentence_bleu(response, reference),
            rouge_l: rouge_l(response, reference),
            f1: token_f1(response, reference),
        }
    }
}

/// Computes every metric the hybrid evaluator aggregates.
#[derive(Clone)]
pub struct MetricEngine {
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for MetricEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricEngine")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish()
    }
}

impl MetricEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Cosine similarity of the response and reference embeddings.
    ///
    /// `None` when there is no usable reference or embedding fails.
    pub fn semantic_similarity(&self, response: &str, reference: Option<&str>) -> Option<f64> {
        let reference = reference.filter(|r| !r.is_empty())?;

        match embedding_similarity(self.embedder.as_ref(), reference, response) {
            Ok(similarity) => Some(similarity),
            Err(e) => {
                warn!(error = %e, "Semantic similarity unavailable");
                None
            }
        }
    }

    /// Lexical scores, or all zeros when the reference is absent or empty.
    pub fn lexical_scores(&self, response: &str, reference: Option<&str>) -> LexicalScores {
        match reference.filter(|r| !r.is_empty()) {
            Some(reference) => LexicalScores::compute(response, reference),
            None => LexicalScores::default(),
        }
    }
}
