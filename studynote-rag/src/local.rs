//! Directory-backed vector store.
//!
//! A [`LocalVectorStore`] owns one directory:
//!
//! - `manifest.json` records the embedding dimensionality and creation time
//! - `chunks.jsonl` holds one JSON record per chunk, in insertion order
//!
//! Records are loaded into memory when the store is opened and every append is
//! written through to disk before it becomes visible to searches.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, check_dimensions, rank};

const BACKEND: &str = "Local";
const MANIFEST_FILE: &str = "manifest.json";
const CHUNKS_FILE: &str = "chunks.jsonl";

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    dimensions: usize,
    created_at: DateTime<Utc>,
}

/// A vector store persisted under a single directory.
#[derive(Debug)]
pub struct LocalVectorStore {
    location: PathBuf,
    dimensions: usize,
    records: RwLock<Vec<EmbeddedChunk>>,
}

impl LocalVectorStore {
    /// Open the store at `location`, creating it if it does not exist.
    ///
    /// An existing store is opened as-is, never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStore`] if the directory cannot be created,
    /// the existing manifest declares a different dimensionality, or a stored
    /// record is unreadable.
    pub async fn open(location: impl Into<PathBuf>, dimensions: usize) -> Result<Self> {
        let location = location.into();
        fs::create_dir_all(&location).await.map_err(|e| {
            RagError::local_store(format!("cannot create '{}': {e}", location.display()))
        })?;

        let manifest_path = location.join(MANIFEST_FILE);
        match fs::read_to_string(&manifest_path).await {
            Ok(raw) => {
                let manifest: Manifest = serde_json::from_str(&raw).map_err(|e| {
                    RagError::local_store(format!("corrupt manifest '{}': {e}", manifest_path.display()))
                })?;
                if manifest.dimensions != dimensions {
                    return Err(RagError::local_store(format!(
                        "store at '{}' holds {}-dimensional embeddings, requested {dimensions}",
                        location.display(),
                        manifest.dimensions
                    )));
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let manifest = Manifest { dimensions, created_at: Utc::now() };
                let raw = serde_json::to_string_pretty(&manifest)
                    .map_err(|e| RagError::local_store(format!("cannot encode manifest: {e}")))?;
                fs::write(&manifest_path, raw).await.map_err(|e| {
                    RagError::local_store(format!("cannot write '{}': {e}", manifest_path.display()))
                })?;
            }
            Err(e) => {
                return Err(RagError::local_store(format!(
                    "cannot read '{}': {e}",
                    manifest_path.display()
                )));
            }
        }

        let records = load_records(&location.join(CHUNKS_FILE)).await?;
        check_dimensions(BACKEND, dimensions, records.iter().map(|r| r.embedding.len()))?;
        debug!(location = %location.display(), records = records.len(), "opened local store");

        Ok(Self { location, dimensions, records: RwLock::new(records) })
    }

    /// Open the store at `location`, requiring it to hold no records.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStore`] if the store already has records, or
    /// for any reason [`open`](Self::open) would fail.
    pub async fn create_empty(location: impl Into<PathBuf>, dimensions: usize) -> Result<Self> {
        let store = Self::open(location, dimensions).await?;
        let existing = store.len().await;
        if existing > 0 {
            return Err(RagError::local_store(format!(
                "store at '{}' already holds {existing} records",
                store.location.display()
            )));
        }
        Ok(store)
    }

    /// The directory backing this store.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Remove everything persisted at `location`, best effort.
    ///
    /// Read-only entries are made writable first. Failures are logged and
    /// never returned; the result tells whether the location is gone.
    pub fn destroy(location: &Path) -> bool {
        if !location.exists() {
            return true;
        }

        for entry in WalkDir::new(location).into_iter().filter_map(std::result::Result::ok) {
            let Ok(metadata) = entry.metadata() else { continue };
            let mut permissions = metadata.permissions();
            if permissions.readonly() {
                permissions.set_readonly(false);
                if let Err(e) = std::fs::set_permissions(entry.path(), permissions) {
                    warn!(path = %entry.path().display(), error = %e, "could not make writable");
                }
            }
        }

        match std::fs::remove_dir_all(location) {
            Ok(()) => {
                info!(location = %location.display(), "removed vector store");
                true
            }
            Err(e) => {
                warn!(location = %location.display(), error = %e, "failed to remove vector store");
                false
            }
        }
    }
}

async fn load_records(path: &Path) -> Result<Vec<EmbeddedChunk>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RagError::local_store(format!("cannot read '{}': {e}", path.display())));
        }
    };

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| {
                RagError::local_store(format!(
                    "corrupt record at {}:{}: {e}",
                    path.display(),
                    number + 1
                ))
            })
        })
        .collect()
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn backend(&self) -> &str {
        BACKEND
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn append(&self, records: &[EmbeddedChunk]) -> Result<()> {
        check_dimensions(BACKEND, self.dimensions, records.iter().map(|r| r.embedding.len()))?;
        if records.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| RagError::local_store(format!("cannot encode record: {e}")))?;
            lines.push_str(&line);
            lines.push('\n');
        }

        // Hold the write lock across the file write so disk order matches memory order.
        let mut stored = self.records.write().await;
        let path = self.location.join(CHUNKS_FILE);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| RagError::local_store(format!("cannot open '{}': {e}", path.display())))?;
        file.write_all(lines.as_bytes())
            .await
            .map_err(|e| RagError::local_store(format!("cannot write '{}': {e}", path.display())))?;
        file.flush()
            .await
            .map_err(|e| RagError::local_store(format!("cannot flush '{}': {e}", path.display())))?;

        stored.extend_from_slice(records);
        debug!(location = %self.location.display(), appended = records.len(), total = stored.len(), "appended records");
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
