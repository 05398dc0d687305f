//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a hosted embedding model behind a unified async
/// interface. Every call against one provider must return vectors of
/// [`dimensions`](EmbeddingProvider::dimensions) length, and
/// [`embed_batch`](EmbeddingProvider::embed_batch) must preserve input order
/// and length. Failures surface as
/// [`RagError::EmbeddingService`](crate::RagError::EmbeddingService) and are
/// never retried by the caller.
///
/// # Example
///
/// ```rust,ignore
/// use studynote_rag::EmbeddingProvider;
///
/// let embedding = provider.embed("photosynthesis").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Provider name used in logs and error messages.
    fn name(&self) -> &str {
        "embedding"
    }
}
