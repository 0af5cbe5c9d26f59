use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToxicityError {
    #[error("toxicity model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load toxicity model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("toxicity inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid toxicity configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for ToxicityError {
    fn from(err: candle_core::Error) -> Self {
        ToxicityError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
