//! Vector store trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};

/// An append-only store of embedded chunks for one workspace.
///
/// All embeddings in a store share one dimensionality, fixed when the store is
/// created. Records keep their insertion order, which is both the order
/// returned by [`sample`](VectorStore::sample) and the tie-breaker for
/// [`search`](VectorStore::search).
///
/// # Example
///
/// ```rust,ignore
/// use studynote_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new(384);
/// store.append(&records).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name used in logs and error messages.
    fn backend(&self) -> &str;

    /// The embedding dimensionality this store accepts.
    fn dimensions(&self) -> usize;

    /// Append embedded chunks after the existing records.
    ///
    /// The whole batch is rejected if any embedding has the wrong dimension.
    async fn append(&self, records: &[EmbeddedChunk]) -> Result<()>;

    /// Search for the `top_k` chunks most similar to the given embedding.
    ///
    /// Returns results ordered by descending cosine similarity, ties broken
    /// by insertion order. Returns every record when the store holds fewer
    /// than `top_k`.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Return the first `n` chunks in insertion order.
    async fn sample(&self, n: usize) -> Result<Vec<Chunk>>;

    /// Number of stored chunks.
    async fn len(&self) -> usize;

    /// Returns `true` if the store holds no chunks.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub(crate) fn check_dimensions(
    backend: &str,
    expected: usize,
    embeddings: impl IntoIterator<Item = usize>,
) -> Result<()> {
    match embeddings.into_iter().find(|len| *len != expected) {
        Some(actual) => Err(RagError::VectorStore {
            backend: backend.to_string(),
            message: format!("embedding has {actual} dimensions, store expects {expected}"),
        }),
        None => Ok(()),
    }
}

/// Score records against a query and keep the best `top_k`.
///
/// The sort is stable, so equal scores stay in insertion order.
pub(crate) fn rank(records: &[EmbeddedChunk], query: &[f32], top_k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<SearchResult> = records
        .iter()
        .map(|record| SearchResult {
            chunk: record.chunk.clone(),
            score: cosine_similarity(&record.embedding, query),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}
