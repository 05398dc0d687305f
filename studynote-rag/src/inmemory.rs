//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps records in a `Vec` behind a
//! `tokio::sync::RwLock`. Nothing outlives the value, which makes it suitable
//! for tests and for callers that do not need a store on disk.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::error::Result;
use crate::vectorstore::{VectorStore, check_dimensions, rank};

const BACKEND: &str = "InMemory";

/// An in-memory vector store using cosine similarity for search.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    records: RwLock<Vec<EmbeddedChunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store accepting embeddings of `dimensions` length.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, records: RwLock::new(Vec::new()) }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend(&self) -> &str {
        BACKEND
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn append(&self, records: &[EmbeddedChunk]) -> Result<()> {
        check_dimensions(BACKEND, self.dimensions, records.iter().map(|r| r.embedding.len()))?;
        self.records.write().await.extend_from_slice(records);
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        check_dimensions(BACKEND, self.dimensions, [embedding.len()])?;
        let records = self.records.read().await;
        Ok(rank(&records, embedding, top_k))
    }

    async fn sample(&self, n: usize) -> Result<Vec<Chunk>> {
        let records = self.records.read().await;
        Ok(records.iter().take(n).map(|r| r.chunk.clone()).collect())
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
