use thiserror::Error;

use crate::embedding::{EmbeddingError, ToxicityError};

#[derive(Debug, Error)]
pub enum SafetyError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("toxicity classification failed: {0}")]
    Toxicity(#[from] ToxicityError),
}
