//! Standalone answer safety checks.
//!
//! None of these gate a response on their own; callers decide what a low similarity or
//! a toxic verdict means for them.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::SafetyError;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{KNOWLEDGE_GAP_THRESHOLD, TOXICITY_THRESHOLD, round3};
use crate::embedding::{Embedder, TOXIC_LABEL, TextClassifier, embedding_similarity};

/// Whether a response covers its reference answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGap {
    /// `similarity >= KNOWLEDGE_GAP_THRESHOLD`.
    pub passed: bool,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToxicityVerdict {
    /// Raw toxic probability exceeded [`TOXICITY_THRESHOLD`].
    pub flagged: bool,
    /// Toxic probability rounded to three decimals.
    pub score: f64,
}

#[derive(Clone)]
pub struct SafetyChecks {
    embedder: Arc<dyn Embedder>,
    classifier: Arc<dyn TextClassifier>,
}

impl std::fmt::Debug for SafetyChecks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyChecks")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish_non_exhaustive()
    }
}

impl SafetyChecks {
    pub fn new(embedder: Arc<dyn Embedder>, classifier: Arc<dyn TextClassifier>) -> Self {
        Self {
            embedder,
            classifier,
        }
    }

    pub fn knowledge_gap(
        &self,
        response: &str,
        reference: &str,
    ) -> Result<KnowledgeGap, SafetyError> {
        let similarity = embedding_similarity(self.embedder.as_ref(), response, reference)?;
        let passed = similarity >= KNOWLEDGE_GAP_THRESHOLD;

        debug!(similarity, passed, "Knowledge gap check");
        Ok(KnowledgeGap { passed, similarity })
    }

    /// Similarity between a response and the context it was generated from.
    pub fn context_alignment(&self, response: &str, context: &str) -> Result<f64, SafetyError> {
        Ok(embedding_similarity(
            self.embedder.as_ref(),
            response,
            context,
        )?)
    }

    /// Rounded response/reference similarity; 0.0 when either side is blank.
    pub fn hallucination_score(&self, response: &str, reference: &str) -> Result<f64, SafetyError> {
        if response.trim().is_empty() || reference.trim().is_empty() {
            return Ok(0.0);
        }

        let similarity = embedding_similarity(self.embedder.as_ref(), response, reference)?;
        Ok(round3(similarity))
    }

    pub fn toxicity(&self, text: &str) -> Result<ToxicityVerdict, SafetyError> {
        let scores = self.classifier.classify(text)?;
        let toxic = scores
            .iter()
            .find(|s| s.label == TOXIC_LABEL)
            .map(|s| s.score)
            .unwrap_or(0.0);

        let verdict = ToxicityVerdict {
            flagged: toxic > TOXICITY_THRESHOLD,
            score: round3(toxic),
        };

        debug!(score = verdict.score, flagged = verdict.flagged, "Toxicity check");
        Ok(verdict)
    }
}
