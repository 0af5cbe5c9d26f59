//! Cross-cutting, shared constants.
//!
//! Thresholds and markers that more than one module (or the HTTP surface) depends on
//! live here so the router, the evaluators and the gateway agree on them.

/// Output dimension of the MiniLM sentence embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence embedder.
pub const DEFAULT_EMBEDDING_MAX_SEQ_LEN: usize = 256;

/// Max tokens fed to the toxicity classifier.
pub const DEFAULT_CLASSIFIER_MAX_SEQ_LEN: usize = 512;

/// Characters of document context injected into a prompt (and returned as preview).
pub const DEFAULT_CONTEXT_PREFIX_CHARS: usize = 1500;

/// Hybrid score below which an evaluation is flagged.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.6;

/// Similarity a response must reach against its reference to pass the knowledge-gap check.
pub const KNOWLEDGE_GAP_THRESHOLD: f64 = 0.8;

/// Toxic-class probability above which text is flagged.
pub const TOXICITY_THRESHOLD: f64 = 0.5;

/// Appended to every condensed web answer.
pub const SUCCESS_MARKER: &str = "✅";

/// Returned when condensation finds nothing worth answering with.
pub const NO_ANSWER_MARKER: &str = "⚠️ No meaningful answer found.";

/// Returned when the generation provider fails.
pub const APOLOGY_MESSAGE: &str = "⚠️ Sorry, I couldn't generate a proper response right now.";

/// System prompt sent with every generation request.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You're FlashQuery, a helpful AI assistant. \
Answer clearly and concisely. If it's a math problem, solve step-by-step. \
If it's a writing question, keep it polite. Use PDF context if provided. \
Use web data carefully. Provide structured steps if user asks how/why/guide.";

/// Rounds to three decimal places (the precision reported by the safety checks).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
