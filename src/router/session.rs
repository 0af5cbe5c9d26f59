use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{Intent, Reply, ReplyStatus};

/// Extracted document text held by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    text: String,
}

impl DocumentContext {
    /// Trims `text`; `None` when nothing is left.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
            })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The first `max_chars` characters.
    pub fn prefix(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One routed question and its reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub intent: Intent,
    pub status: ReplyStatus,
    pub timestamp: DateTime<Utc>,
}

/// Per-caller routing state: the loaded document and the conversation so far.
///
/// History grows without bound for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    context: Option<DocumentContext>,
    history: Vec<Turn>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            context: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the document context; blank text clears it.
    pub fn load_context(&mut self, text: &str) -> Option<&DocumentContext> {
        self.context = DocumentContext::new(text);
        self.context.as_ref()
    }

    pub fn clear_context(&mut self) {
        self.context = None;
    }

    pub fn context(&self) -> Option<&DocumentContext> {
        self.context.as_ref()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn record(&mut self, question: &str, reply: &Reply) {
        self.history.push(Turn {
            question: question.to_string(),
            answer: reply.text.clone(),
            intent: reply.intent,
            status: reply.status.clone(),
            timestamp: Utc::now(),
        });
    }
}
