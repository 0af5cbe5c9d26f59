use super::types::Intent;
use crate::text::word_count;

/// Phrases that point a question at the loaded document.
pub const DOCUMENT_PHRASES: &[&str] = &[
    "in the pdf",
    "according to the document",
    "based on the file",
    "from the report",
    "this document",
    "in this file",
    "from uploaded",
    "as per the pdf",
];

/// Phrases of phrasing / introduction questions.
pub const STYLE_PHRASES: &[&str] = &[
    "say on the phone",
    "how to say",
    "what's better",
    "is it okay to say",
    "polite way",
    "this is rohan",
    "how should i introduce",
];

/// Substrings that suggest the answer depends on current events.
pub const RECENCY_PHRASES: &[&str] = &[
    "latest", "current", "today", "now", "recent", "trending", "live", "news",
];

/// Openers of short factual lookups.
pub const FACTUAL_PREFIXES: &[&str] = &[
    "who is",
    "what is",
    "when is",
    "how many",
    "how much",
    "where is",
];

/// Longest factual question (in words) still sent to search.
pub const FACTUAL_MAX_WORDS: usize = 12;

/// A test on the lowercased question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Any phrase occurs as a substring.
    ContainsAny(Vec<String>),
    /// Starts with one of the prefixes and has at most `max_words` words.
    PrefixWithinWords {
        prefixes: Vec<String>,
        max_words: usize,
    },
}

impl Matcher {
    pub fn contains_any(phrases: &[&str]) -> Self {
        Matcher::ContainsAny(phrases.iter().map(|p| p.to_string()).collect())
    }

    pub fn prefix_within_words(prefixes: &[&str], max_words: usize) -> Self {
        Matcher::PrefixWithinWords {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            max_words,
        }
    }

    /// `question` must already be lowercased.
    pub fn matches(&self, question: &str) -> bool {
        match self {
            Matcher::ContainsAny(phrases) => phrases.iter().any(|p| question.contains(p.as_str())),
            Matcher::PrefixWithinWords {
                prefixes,
                max_words,
            } => {
                prefixes.iter().any(|p| question.starts_with(p.as_str()))
                    && word_count(question) <= *max_words
            }
        }
    }
}

/// One row of the routing table; matches when any of its matchers does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    /// Skip this rule unless a non-empty document context is loaded.
    pub requires_context: bool,
    pub matchers: Vec<Matcher>,
}

impl IntentRule {
    pub fn new(intent: Intent, matchers: Vec<Matcher>) -> Self {
        Self {
            intent,
            requires_context: false,
            matchers,
        }
    }

    pub fn requiring_context(mut self) -> Self {
        self.requires_context = true;
        self
    }

    fn applies(&self, question: &str, has_context: bool) -> bool {
        (!self.requires_context || has_context) && self.matchers.iter().any(|m| m.matches(question))
    }
}

/// Ordered routing table; the first applicable rule wins, otherwise [`Intent::Fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRules {
    rules: Vec<IntentRule>,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self::new(vec![
            IntentRule::new(Intent::Document, vec![Matcher::contains_any(DOCUMENT_PHRASES)])
                .requiring_context(),
            IntentRule::new(Intent::Style, vec![Matcher::contains_any(STYLE_PHRASES)]),
            IntentRule::new(
                Intent::WebSearch,
                vec![
                    Matcher::contains_any(RECENCY_PHRASES),
                    Matcher::prefix_within_words(FACTUAL_PREFIXES, FACTUAL_MAX_WORDS),
                ],
            ),
        ])
    }
}

impl IntentRules {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, question: &str, has_context: bool) -> Intent {
        let question = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.applies(&question, has_context))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }
}
