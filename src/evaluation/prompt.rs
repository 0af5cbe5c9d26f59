use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use super::sequence::sequence_ratio;
use super::sink::{DiagnosticSink, TracingSink};
use super::types::{PromptEvaluation, RuleCheck};
use crate::text::{stopword_ratio, tokenize, word_count};

/// Minimum words in a response (rule check) and tokens in a prompt (quality check).
pub const MIN_WORDS: usize = 5;

/// Prompt stop-word fraction above which the prompt is considered low quality.
pub const MAX_STOPWORD_RATIO: f64 = 0.6;

/// Largest response/prompt word ratio accepted for "concise"/"paraphrase" prompts.
pub const MAX_COMPRESSION_RATIO: f64 = 0.8;

/// Similarity at or above which a "rephrase" response is considered a copy.
pub const MAX_REPHRASE_SIMILARITY: f64 = 0.8;

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*•]").expect("bullet pattern is valid"));

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.").expect("numbered pattern is valid"));

/// Relevance (any prompt word appears in the response) and minimum length.
pub fn rule_based_eval(response: &str, prompt: &str) -> RuleCheck {
    let response_lower = response.to_lowercase();
    let prompt_lower = prompt.to_lowercase();

    RuleCheck {
        relevance: prompt_lower
            .split_whitespace()
            .any(|word| response_lower.contains(word)),
        length_ok: word_count(response) >= MIN_WORDS,
    }
}

/// Whether the response follows a formatting instruction found in the prompt.
///
/// Only the first matching instruction is checked; prompts without one pass.
pub fn adherence_check(response: &str, prompt: &str) -> bool {
    let prompt_lower = prompt.to_lowercase();

    if prompt_lower.contains("bullet point") {
        return BULLET_LINE.find_iter(response).count() >= 2;
    }

    if prompt_lower.contains("numbered list") || prompt_lower.contains("list in numbers") {
        return NUMBERED_LINE.find_iter(response).count() >= 2;
    }

    if prompt_lower.contains("concise") || prompt_lower.contains("paraphrase") {
        let prompt_words = word_count(prompt).max(1);
        let ratio = word_count(response) as f64 / prompt_words as f64;
        return ratio <= MAX_COMPRESSION_RATIO;
    }

    if prompt_lower.contains("rephrase") {
        let similarity = sequence_ratio(&prompt_lower, &response.to_lowercase());
        return similarity < MAX_REPHRASE_SIMILARITY;
    }

    true
}

/// Whether the prompt is long enough and not dominated by stop words.
pub fn quality_check(prompt: &str) -> bool {
    let tokens = tokenize(prompt);
    if tokens.len() < MIN_WORDS {
        return false;
    }
    stopword_ratio(&tokens) <= MAX_STOPWORD_RATIO
}

/// Runs the three prompt checks and reports flagged pairs to a [`DiagnosticSink`].
#[derive(Clone)]
pub struct PromptEvaluator {
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for PromptEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEvaluator").finish_non_exhaustive()
    }
}

impl Default for PromptEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl PromptEvaluator {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    pub fn evaluate(&self, response: &str, prompt: &str) -> PromptEvaluation {
        let evaluation = PromptEvaluation::new(
            rule_based_eval(response, prompt),
            adherence_check(response, prompt),
            quality_check(prompt),
        );

        debug!(
            relevance = evaluation.rule_check.relevance,
            length_ok = evaluation.rule_check.length_ok,
            adherence = evaluation.adherence_check,
            quality = evaluation.quality_check,
            flagged = evaluation.flagged,
            "Prompt evaluated"
        );

        if evaluation.flagged {
            self.sink.flagged_prompt(prompt, response, &evaluation);
        }

        evaluation
    }
}
