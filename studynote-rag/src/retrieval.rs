//! Batched indexing and similarity retrieval.
//!
//! [`Indexer`] embeds chunks in bounded batches and appends them to a
//! [`VectorStore`]; [`RetrievalEngine`] embeds a query and searches a store.
//! Both report embedding failures as
//! [`RagError::EmbeddingService`](crate::RagError::EmbeddingService) without
//! retrying.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;
use crate::workspace::Workspace;

/// Embeds chunks and appends them to a store, `batch_size` chunks at a time.
///
/// Batching bounds request size and memory only: the stored records are the
/// same as for a single unbatched call.
pub struct Indexer {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl Indexer {
    /// Create an indexer. A `batch_size` of zero is treated as one.
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self { embedding_provider, batch_size: batch_size.max(1) }
    }

    /// Embed and append `chunks` in order. Returns the number stored.
    ///
    /// # Errors
    ///
    /// Returns the embedding provider's error, or
    /// [`RagError::EmbeddingService`] if it returns the wrong number of
    /// vectors. Batches appended before the failure stay in the store.
    pub async fn add(&self, store: &dyn VectorStore, chunks: &[Chunk]) -> Result<usize> {
        for (batch_number, batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                error!(batch = batch_number, error = %e, "embedding failed during indexing");
                e
            })?;

            if embeddings.len() != batch.len() {
                error!(
                    batch = batch_number,
                    expected = batch.len(),
                    actual = embeddings.len(),
                    "embedding count mismatch"
                );
                return Err(RagError::EmbeddingService {
                    provider: self.embedding_provider.name().to_string(),
                    message: format!(
                        "expected {} embeddings, received {}",
                        batch.len(),
                        embeddings.len()
                    ),
                });
            }

            let records: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
                .collect();
            store.append(&records).await?;
            debug!(batch = batch_number, size = records.len(), "indexed batch");
        }

        info!(backend = store.backend(), chunk_count = chunks.len(), "indexed chunks");
        Ok(chunks.len())
    }
}

/// Embeds queries and returns the most similar stored chunks.
pub struct RetrievalEngine {
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl RetrievalEngine {
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedding_provider }
    }

    /// Retrieve the `k` chunks of the workspace's store most similar to `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::WorkspaceNotReady`] if the workspace has no usable
    /// store, or the embedding provider's error.
    pub async fn retrieve(
        &self,
        workspace: &Workspace,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let store = workspace.ready_store().await?;
        self.search_store(store, query, k).await
    }

    /// Retrieve the `k` chunks of `store` most similar to `query`.
    pub async fn search_store(
        &self,
        store: &dyn VectorStore,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = store.search(&embedding, k).await?;
        debug!(backend = store.backend(), k, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }
}
