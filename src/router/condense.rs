use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{NO_ANSWER_MARKER, SUCCESS_MARKER};
use crate::providers::SearchResult;
use crate::text::word_count;

/// Sentences with this many words or fewer are discarded.
pub const MIN_SENTENCE_WORDS: usize = 4;

/// Numbered steps needed before the answer is built from steps.
pub const MIN_STEPS: usize = 3;

/// Numbered steps kept in a step answer.
pub const MAX_STEPS: usize = 5;

static STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.").expect("step pattern is valid"));

static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("keyword pattern is valid"));

/// Reduces raw search output to one short answer ending in the success marker.
///
/// Returns [`NO_ANSWER_MARKER`] when no sentence survives filtering.
pub fn condense(raw: &SearchResult, question: &str) -> String {
    condense_text(&raw.flatten(), question)
}

pub fn condense_text(raw: &str, question: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '"' | '\''))
        .collect();

    let sentences = candidate_sentences(&cleaned);

    let steps: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|s| STEP.is_match(s))
        .collect();
    if steps.len() >= MIN_STEPS {
        let joined = steps[..steps.len().min(MAX_STEPS)].join(" ");
        return with_marker(joined.trim());
    }

    let question = question.to_lowercase();
    let keywords: Vec<&str> = KEYWORD.find_iter(&question).map(|m| m.as_str()).collect();

    if let Some(sentence) = sentences.iter().find(|s| {
        let lowered = s.to_lowercase();
        keywords.iter().any(|k| lowered.contains(k))
    }) {
        return with_marker(sentence);
    }

    match sentences.first() {
        Some(first) => with_marker(first),
        None => NO_ANSWER_MARKER.to_string(),
    }
}

fn with_marker(sentence: &str) -> String {
    format!("{} {}", sentence.trim(), SUCCESS_MARKER)
}

/// Trimmed, de-duplicated sentences longer than [`MIN_SENTENCE_WORDS`] words.
fn candidate_sentences(text: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty() && word_count(s) > MIN_SENTENCE_WORDS)
        .filter(|s| seen.insert(*s))
        .collect()
}

/// Splits after `.`, `?` or `!` followed by whitespace, and at every newline.
///
/// The whitespace run after terminal punctuation is consumed by the split.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '?' | '!')) {
            pieces.push(&text[start..idx]);
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = text[..end].chars().next_back();
            continue;
        }

        if c == '\n' {
            pieces.push(&text[start..idx]);
            start = idx + 1;
        }
        prev = Some(c);
    }

    pieces.push(&text[start..]);
    pieces
}
