//! Answer evaluation: prompt checks plus the hybrid semantic/lexical score.
//!
//! [`PromptEvaluator`] runs three cheap checks on a prompt/response pair.
//! [`HybridEvaluator`] adds embedding similarity, BLEU, ROUGE-L and token F1 against a
//! reference answer from a [`ReferenceDictionary`] and averages them. Anything flagged
//! goes to a [`DiagnosticSink`].

pub mod hybrid;
pub mod prompt;
pub mod sequence;
pub mod sink;
pub mod types;


pub use hybrid::HybridEvaluator;
pub use prompt::{PromptEvaluator, adherence_check, quality_check, rule_based_eval};
pub use sequence::sequence_ratio;
#[cfg(any(test, feature = "mock"))]
pub use sink::RecordingSink;
pub use sink::{DiagnosticSink, FLAGGED_TARGET, TracingSink};
pub use types::{EvaluationResult, PromptEvaluation, ReferenceDictionary, RuleCheck};
