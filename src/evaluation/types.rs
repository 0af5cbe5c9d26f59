use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Basic sanity of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCheck {
    /// Some prompt word appears (as a substring) in the response.
    pub relevance: bool,
    /// The response has at least five words.
    pub length_ok: bool,
}

impl RuleCheck {
    pub fn passed(&self) -> bool {
        self.relevance && self.length_ok
    }
}

/// Outcome of the rule, adherence and quality checks for one prompt/response pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEvaluation {
    pub rule_check: RuleCheck,
    pub adherence_check: bool,
    pub quality_check: bool,
    pub flagged: bool,
}

impl PromptEvaluation {
    /// Builds an evaluation, deriving `flagged` from the three checks.
    pub fn new(rule_check: RuleCheck, adherence_check: bool, quality_check: bool) -> Self {
        let flagged = !rule_check.passed() || !adherence_check || !quality_check;
        Self {
            rule_check,
            adherence_check,
            quality_check,
            flagged,
        }
    }
}

/// Full hybrid evaluation of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub response: String,
    pub semantic_score: f64,
    pub bleu_score: f64,
    pub rouge_score: f64,
    pub f1_score: f64,
    /// Mean of the four scores above.
    pub hybrid_score: f64,
    pub prompt_eval: PromptEvaluation,
    /// `prompt_eval.flagged || hybrid_score < threshold`.
    pub flagged: bool,
}

/// Prompt text (exact match) to reference answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceDictionary {
    entries: HashMap<String, String>,
}

impl ReferenceDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON object of `{"prompt": "reference", ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::References {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::References {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn insert(&mut self, prompt: impl Into<String>, reference: impl Into<String>) {
        self.entries.insert(prompt.into(), reference.into());
    }

    /// Reference for `prompt`; an empty reference counts as absent.
    pub fn get(&self, prompt: &str) -> Option<&str> {
        self.entries
            .get(prompt)
            .map(String::as_str)
            .filter(|r| !r.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, R: Into<String>> FromIterator<(P, R)> for ReferenceDictionary {
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(p, r)| (p.into(), r.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for ReferenceDictionary {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}
