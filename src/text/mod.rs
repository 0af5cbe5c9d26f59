//! Text normalization shared by every lexical metric.
//!
//! [`tokenize`] is the single source of token boundaries for BLEU, F1 and the prompt
//! quality checks. ROUGE-L uses its own stemmed tokenization ([`rouge_tokens`]) because
//! the metric is defined over stemmed alphanumeric tokens.

mod stopwords;

#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

pub use stopwords::{ENGLISH_STOPWORDS, is_stopword};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("non-alphanumeric pattern is valid"));

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Lowercases `text`, turns every run of non-word characters into a space and splits.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of whitespace-separated words (punctuation stays attached).
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Tokens for ROUGE scoring: lowercase ASCII alphanumerics, stemmed when longer than 3 chars.
pub fn rouge_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(|token| {
            if token.chars().count() > 3 {
                STEMMER.stem(token).into_owned()
            } else {
                token.to_string()
            }
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Fraction of `tokens` that are English stop words (0.0 for an empty slice).
pub fn stopword_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let stop = tokens.iter().filter(|t| is_stopword(t)).count();
    stop as f64 / tokens.len() as f64
}
