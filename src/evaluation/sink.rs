use super::types::{EvaluationResult, PromptEvaluation};
use tracing::warn;

/// Log target used by [`TracingSink`].
pub const FLAGGED_TARGET: &str = "flashquery::flagged";

/// Receives evaluations that were flagged for review.
///
/// Implementations must not fail or panic; reporting never affects the evaluation.
pub trait DiagnosticSink: Send + Sync {
    fn flagged_prompt(&self, prompt: &str, response: &str, evaluation: &PromptEvaluation);

    fn flagged_evaluation(&self, prompt: &str, result: &EvaluationResult);
}

/// Emits flagged records as structured `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn flagged_prompt(&self, prompt: &str, response: &str, evaluation: &PromptEvaluation) {
        warn!(
            target: FLAGGED_TARGET,
            prompt,
            response,
            relevance = evaluation.rule_check.relevance,
            length_ok = evaluation.rule_check.length_ok,
            adherence = evaluation.adherence_check,
            quality = evaluation.quality_check,
            "Prompt flagged for review"
        );
    }

    fn flagged_evaluation(&self, prompt: &str, result: &EvaluationResult) {
        warn!(
            target: FLAGGED_TARGET,
            prompt,
            response = %result.response,
            relevance = result.prompt_eval.rule_check.relevance,
            length_ok = result.prompt_eval.rule_check.length_ok,
            adherence = result.prompt_eval.adherence_check,
            quality = result.prompt_eval.quality_check,
            semantic = result.semantic_score,
            bleu = result.bleu_score,
            rouge = result.rouge_score,
            f1 = result.f1_score,
            hybrid = result.hybrid_score,
            "Hybrid evaluation flagged"
        );
    }
}

/// Keeps flagged records in memory.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    prompts: parking_lot::Mutex<Vec<(String, PromptEvaluation)>>,
    evaluations: parking_lot::Mutex<Vec<(String, EvaluationResult)>>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flagged_prompts(&self) -> Vec<(String, PromptEvaluation)> {
        self.prompts.lock().clone()
    }

    pub fn flagged_evaluations(&self) -> Vec<(String, EvaluationResult)> {
        self.evaluations.lock().clone()
    }
}

#[cfg(any(test, feature = "mock"))]
impl DiagnosticSink for RecordingSink {
    fn flagged_prompt(&self, prompt: &str, _response: &str, evaluation: &PromptEvaluation) {
        self.prompts.lock().push((prompt.to_string(), *evaluation));
    }

    fn flagged_evaluation(&self, prompt: &str, result: &EvaluationResult) {
        self.evaluations
            .lock()
            .push((prompt.to_string(), result.clone()));
    }
}
