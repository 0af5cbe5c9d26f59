use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::embedding::{Embedder, EmbeddingError};

/// Default number of embeddings kept in memory.
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 4_096;

/// Memoizes another [`Embedder`], keyed by the BLAKE3 hash of the input text.
///
/// Reference answers are embedded on every evaluation of their prompt; caching keeps
/// repeated evaluations from re-running the encoder.
pub struct CachedEmbedder<E: Embedder> {
    inner: E,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<E: Embedder> std::fmt::Debug for CachedEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("entries", &self.cache.entry_count())
            .field("embedding_dim", &self.inner.embedding_dim())
            .finish()
    }
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, DEFAULT_EMBEDDING_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: E, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Number of cached embeddings (eventually consistent, see moka docs).
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = *blake3::hash(text.as_bytes()).as_bytes();

        if let Some(hit) = self.cache.get(&key) {
            debug!(text_len = text.len(), "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let embedding = self.inner.embed(text)?;
        self.cache.insert(key, Arc::new(embedding.clone()));
        Ok(embedding)
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }
}
