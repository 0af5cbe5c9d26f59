//! Embedding + model utilities.
//!
//! - [`sentence`] provides mean-pooled sentence embeddings (MiniLM / BERT).
//! - [`toxicity`] provides the BERT toxicity classifier used by [`crate::safety`].
//! - [`cache`] memoizes embeddings so repeated references are embedded once.
//!
//! Every model-backed component has a deterministic stub mode so the service and the
//! test suite run without model files.

/// BERT sequence-classification head used by the toxicity classifier.
pub mod bert;
/// Embedding memoization.
pub mod cache;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder.
pub mod sentence;
/// Toxicity classifier.
pub mod toxicity;
/// Tokenizer loading helpers.
pub mod utils;

pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use sentence::{SENTENCE_EMBEDDING_DIM, SentenceConfig, SentenceEmbedder};
pub use toxicity::{
    LabelScore, TOXIC_LABEL, TextClassifier, ToxicityClassifier, ToxicityConfig, ToxicityError,
};

/// Turns text into a fixed-size dense vector.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Embedder: Send + Sync {
    /// Embeds a single string.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output vector dimension.
    fn embedding_dim(&self) -> usize;
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm or lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Embeds both strings and returns their cosine similarity.
pub fn embedding_similarity(
    embedder: &dyn Embedder,
    left: &str,
    right: &str,
) -> Result<f64, EmbeddingError> {
    let left = embedder.embed(left)?;
    let right = embedder.embed(right)?;
    Ok(cosine_similarity(&left, &right))
}
