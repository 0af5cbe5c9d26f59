use std::sync::Arc;

use tracing::debug;

use super::prompt::PromptEvaluator;
use super::sink::DiagnosticSink;
use super::types::{EvaluationResult, ReferenceDictionary};
use crate::metrics::MetricEngine;

/// Combines prompt checks with semantic and lexical scores.
#[derive(Debug, Clone)]
pub struct HybridEvaluator {
    metrics: MetricEngine,
    prompts: PromptEvaluator,
}

impl HybridEvaluator {
    pub fn new(metrics: MetricEngine, prompts: PromptEvaluator) -> Self {
        Self { metrics, prompts }
    }

    pub fn metrics(&self) -> &MetricEngine {
        &self.metrics
    }

    pub fn prompts(&self) -> &PromptEvaluator {
        &self.prompts
    }

    fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        self.prompts.sink()
    }

    /// Scores `response` to `prompt`, looking the reference up by exact prompt text.
    ///
    /// Missing metrics count as 0.0 in the mean. The result is flagged when the prompt
    /// checks flag it or the hybrid score falls below `threshold`.
    pub fn evaluate(
        &self,
        response: &str,
        prompt: &str,
        references: &ReferenceDictionary,
        threshold: f64,
    ) -> EvaluationResult {
        let prompt_eval = self.prompts.evaluate(response, prompt);
        let reference = references.get(prompt);

        let semantic_score = self
            .metrics
            .semantic_similarity(response, reference)
            .unwrap_or(0.0);
        let lexical = self.metrics.lexical_scores(response, reference);

        let hybrid_score = (semantic_score + lexical.bleu + lexical.rouge_l + lexical.f1) / 4.0;
        let flagged = prompt_eval.flagged || hybrid_score < threshold;

        let result = EvaluationResult {
            response: response.to_string(),
            semantic_score,
            bleu_score: lexical.bleu,
            rouge_score: lexical.rouge_l,
            f1_score: lexical.f1,
            hybrid_score,
            prompt_eval,
            flagged,
        };

        debug!(
            has_reference = reference.is_some(),
            hybrid = hybrid_score,
            threshold,
            flagged,
            "Hybrid evaluation complete"
        );

        if flagged {
            self.sink().flagged_evaluation(prompt, &result);
        }

        result
    }
}
