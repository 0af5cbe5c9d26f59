use std::path::PathBuf;
use thiserror::Error;

/// Failures of the sentence embedder (loading or encoding).
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence model directory {} does not exist", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("sentence model could not be loaded: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("sentence encoding failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("sentence tokenizer rejected input: {reason}")]
    TokenizationFailed { reason: String },

    #[error("sentence embedder misconfigured: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

/// Reading `config.json` or the weights from disk.
impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: format!("model file unreadable: {}", err),
        }
    }
}
