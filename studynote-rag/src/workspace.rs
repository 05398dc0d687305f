//! Per-session workspace lifecycle.
//!
//! A [`Session`] holds at most one live [`Workspace`]: the uploaded
//! [`Document`], the location of its vector store, and the cached summary.
//! The lifecycle is
//!
//! ```text
//! Empty --upload--> Indexing --ok--> Ready --reset--> Empty
//!                       \--err--> Failed
//! ```
//!
//! and any upload replaces the live workspace. A `Workspace` owns its store
//! directory: dropping it (reset, replacement, or the session going away)
//! removes the directory, best effort.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::document::Document;
use crate::error::{RagError, Result};
use crate::local::LocalVectorStore;
use crate::vectorstore::VectorStore;

/// Where a workspace is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceState {
    /// The document is being chunked, embedded and stored.
    Indexing,
    /// The store is complete; questions and quizzes can be served.
    Ready,
    /// Indexing failed; the store may be absent or partially populated.
    Failed,
}

/// The state bound to one uploaded document.
#[derive(Debug)]
pub struct Workspace {
    document: Document,
    location: PathBuf,
    state: WorkspaceState,
    store: Option<LocalVectorStore>,
    summary: Option<String>,
}

impl Workspace {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Directory of this workspace's vector store.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn state(&self) -> WorkspaceState {
        self.state
    }

    /// The cached summary, once one has been generated.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// The store, if indexing completed and it holds at least one chunk.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::WorkspaceNotReady`] otherwise.
    pub async fn ready_store(&self) -> Result<&LocalVectorStore> {
        let store = match (&self.state, &self.store) {
            (WorkspaceState::Ready, Some(store)) => store,
            _ => {
                return Err(RagError::WorkspaceNotReady(format!(
                    "'{}' has not been indexed",
                    self.document.file_name
                )));
            }
        };
        if store.is_empty().await {
            return Err(RagError::WorkspaceNotReady(format!(
                "'{}' produced no indexed content",
                self.document.file_name
            )));
        }
        Ok(store)
    }

    pub(crate) fn store(&self) -> Option<&LocalVectorStore> {
        self.store.as_ref()
    }

    pub(crate) fn mark_ready(&mut self, store: LocalVectorStore) {
        self.store = Some(store);
        self.state = WorkspaceState::Ready;
    }

    /// Keep whatever store indexing got as far as building, for summary retries.
    pub(crate) fn mark_failed(&mut self, partial: Option<LocalVectorStore>) {
        self.store = partial;
        self.state = WorkspaceState::Failed;
    }

    pub(crate) fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
    }
}

impl Drop for Workspace {
    // Blocking filesystem work on the calling thread; stores are small.
    fn drop(&mut self) {
        // Release the in-memory records before the directory goes away.
        self.store = None;
        LocalVectorStore::destroy(&self.location);
    }
}

/// One user's session: empty, or exactly one live [`Workspace`].
///
/// Operations that change the workspace take `&mut Session`, so a session is
/// never mutated by two operations at once.
#[derive(Debug, Default)]
pub struct Session {
    workspace: Option<Workspace>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub(crate) fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.workspace.as_mut()
    }

    /// Returns `true` when no document has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.workspace.is_none()
    }

    /// The live workspace, or [`RagError::WorkspaceNotReady`].
    pub fn require_workspace(&self) -> Result<&Workspace> {
        self.workspace.as_ref().ok_or_else(|| {
            RagError::WorkspaceNotReady("no document has been uploaded".to_string())
        })
    }
}

/// Allocates workspace store locations and drives lifecycle transitions.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    store_root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self { store_root: store_root.into() }
    }

    /// Replace the session's workspace with a fresh one in `Indexing` state.
    ///
    /// The previous workspace, if any, is dropped (and its store removed)
    /// before the new one is created.
    pub fn begin<'a>(&self, session: &'a mut Session, document: Document) -> &'a mut Workspace {
        self.reset(session);

        let suffix = Uuid::new_v4().simple().to_string();
        let location = self.store_root.join(format!("store_{}_{}", document.base_name, &suffix[..8]));
        info!(file = %document.file_name, location = %location.display(), "starting workspace");

        session.workspace.insert(Workspace {
            document,
            location,
            state: WorkspaceState::Indexing,
            store: None,
            summary: None,
        })
    }

    /// Drop the session's workspace, leaving it empty. Never fails.
    pub fn reset(&self, session: &mut Session) {
        if let Some(old) = session.workspace.take() {
            info!(file = %old.document.file_name, location = %old.location.display(), "discarding workspace");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chunk, EmbeddedChunk};

    #[tokio::test]
    async fn begin_allocates_unique_locations_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(dir.path());
        let mut session = Session::new();

        let first = manager.begin(&mut session, Document::from_upload("a", "notes.txt"));
        let first_location = first.location().to_path_buf();
        assert_eq!(first.state(), WorkspaceState::Indexing);
        assert!(first_location.starts_with(dir.path()));
        assert!(first_location.file_name().unwrap().to_string_lossy().starts_with("store_notes_"));

        let second = manager.begin(&mut session, Document::from_upload("b", "notes.txt"));
        assert_ne!(second.location(), first_location);
    }

    #[tokio::test]
    async fn replacing_a_workspace_removes_the_old_store() {
        let dir = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(dir.path());
        let mut session = Session::new();

        let workspace = manager.begin(&mut session, Document::from_upload("a", "one.txt"));
        let store = LocalVectorStore::open(workspace.location(), 2).await.unwrap();
        let old_location = workspace.location().to_path_buf();
        workspace.mark_ready(store);
        assert!(old_location.exists());

        manager.begin(&mut session, Document::from_upload("b", "two.txt"));
        assert!(!old_location.exists());
        assert_eq!(session.workspace().unwrap().document().file_name, "two.txt");
    }

    #[tokio::test]
    async fn ready_store_requires_ready_and_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(dir.path());
        let mut session = Session::new();
        assert!(matches!(session.require_workspace(), Err(RagError::WorkspaceNotReady(_))));

        let workspace = manager.begin(&mut session, Document::from_upload("", "empty.txt"));
        assert!(matches!(workspace.ready_store().await, Err(RagError::WorkspaceNotReady(_))));

        let store = LocalVectorStore::open(workspace.location(), 2).await.unwrap();
        workspace.mark_ready(store);
        assert!(matches!(workspace.ready_store().await, Err(RagError::WorkspaceNotReady(_))));

        let record = EmbeddedChunk {
            chunk: Chunk { index: 0, start: 0, text: "x".into() },
            embedding: vec![1.0, 0.0],
        };
        workspace.store().unwrap().append(&[record]).await.unwrap();
        assert!(workspace.ready_store().await.is_ok());

        workspace.mark_failed(None);
        assert!(workspace.ready_store().await.is_err());
    }

    #[tokio::test]
    async fn reset_leaves_session_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(dir.path());
        let mut session = Session::new();
        let location = {
            let workspace = manager.begin(&mut session, Document::from_upload("a", "a.txt"));
            std::fs::create_dir_all(workspace.location()).unwrap();
            workspace.location().to_path_buf()
        };

        manager.reset(&mut session);
        assert!(session.is_empty());
        assert!(!location.exists());
        manager.reset(&mut session);
    }
}
