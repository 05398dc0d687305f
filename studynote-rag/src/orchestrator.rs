//! Study session orchestrator.
//!
//! The [`RagOrchestrator`] composes a [`Chunker`], an [`EmbeddingProvider`],
//! per-workspace [`LocalVectorStore`]s and a [`GenerationProvider`] into the
//! operations a study session exposes:
//!
//! - [`index_and_summarize`](RagOrchestrator::index_and_summarize): chunk →
//!   embed → store the uploaded text, then summarize its opening chunks once
//! - [`ask`](RagOrchestrator::ask): retrieve the closest chunks and answer
//!   strictly from them
//! - [`generate_quiz`](RagOrchestrator::generate_quiz): build a
//!   multiple-choice quiz from the opening chunks
//! - [`reset_workspace`](RagOrchestrator::reset_workspace): discard the
//!   document and its store
//!
//! # Example
//!
//! ```rust,ignore
//! use studynote_rag::{RagConfig, RagOrchestrator, Session};
//!
//! let orchestrator = RagOrchestrator::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .generation_provider(Arc::new(model))
//!     .build()?;
//!
//! let mut session = Session::new();
//! let summary = orchestrator.index_and_summarize(&mut session, &text, "notes.pdf").await?;
//! let answer = orchestrator.ask(&session, "What is osmosis?").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::chunking::{Chunker, WhitespaceChunker};
use crate::config::RagConfig;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{GenerationProvider, GenerationRequest};
use crate::local::LocalVectorStore;
use crate::prompt::{answer_instruction, context_or_placeholder, quiz_instruction, summary_instruction};
use crate::quiz::{QuizItem, parse_quiz};
use crate::retrieval::{Indexer, RetrievalEngine};
use crate::vectorstore::VectorStore;
use crate::workspace::{Session, Workspace, WorkspaceManager, WorkspaceState};

/// Runs indexing, summarization, question answering and quiz generation for
/// study sessions. Construct one via [`RagOrchestrator::builder()`].
///
/// The orchestrator holds no session state: every operation receives the
/// caller's [`Session`], so one orchestrator serves any number of sessions.
pub struct RagOrchestrator {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    generation_provider: Arc<dyn GenerationProvider>,
    workspaces: WorkspaceManager,
    indexer: Indexer,
    retrieval: RetrievalEngine,
}

impl RagOrchestrator {
    /// Create a new [`RagOrchestratorBuilder`].
    pub fn builder() -> RagOrchestratorBuilder {
        RagOrchestratorBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Index a freshly uploaded document and summarize it.
    ///
    /// Any previous workspace in the session is discarded first. On success
    /// the workspace is `Ready` and the summary is cached on it.
    ///
    /// # Errors
    ///
    /// - Embedding or storage failures leave the workspace `Failed` with no
    ///   summary. Only [`summarize`](Self::summarize) can be retried on it.
    /// - A generation failure leaves the workspace `Ready` with no summary;
    ///   [`summarize`](Self::summarize) retries it.
    pub async fn index_and_summarize(
        &self,
        session: &mut Session,
        text: &str,
        display_name: &str,
    ) -> Result<String> {
        let document = Document::from_upload(text, display_name);
        let workspace = self.workspaces.begin(session, document);

        let indexed = match LocalVectorStore::create_empty(
            workspace.location(),
            self.embedding_provider.dimensions(),
        )
        .await
        {
            Ok(store) => match self.build_index(workspace, &store).await {
                Ok(()) => Ok(store),
                Err(e) => Err((e, Some(store))),
            },
            Err(e) => Err((e, None)),
        };

        match indexed {
            Ok(store) => workspace.mark_ready(store),
            Err((e, partial)) => {
                error!(file = %workspace.document().file_name, error = %e, "indexing failed");
                workspace.mark_failed(partial);
                return Err(e);
            }
        }

        self.summarize(session).await
    }

    async fn build_index(&self, workspace: &Workspace, store: &LocalVectorStore) -> Result<()> {
        let chunks = self.chunker.split(&workspace.document().text);
        self.indexer.add(store, &chunks).await?;

        info!(
            file = %workspace.document().file_name,
            location = %workspace.location().display(),
            chunk_count = chunks.len(),
            "indexed document"
        );
        Ok(())
    }

    /// Return the workspace summary, generating it if it is not cached yet.
    ///
    /// The model is called at most once per successful summary; later calls
    /// return the cached text. A `Failed` workspace is summarized from the
    /// chunks stored before the failure, or from a placeholder when there
    /// are none.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::WorkspaceNotReady`] if no document has been
    /// uploaded, or the generation provider's error.
    pub async fn summarize(&self, session: &mut Session) -> Result<String> {
        let workspace = session.workspace_mut().ok_or_else(|| {
            RagError::WorkspaceNotReady("no document has been uploaded".to_string())
        })?;
        if let Some(summary) = workspace.summary() {
            return Ok(summary.to_string());
        }

        // A failed workspace can still be summarized from whatever was stored.
        let sample = match (workspace.state(), workspace.store()) {
            (WorkspaceState::Indexing, _) => {
                return Err(RagError::WorkspaceNotReady(format!(
                    "'{}' is still being indexed",
                    workspace.document().file_name
                )));
            }
            (_, Some(store)) => store.sample(self.config.summary_sample_size).await?,
            (_, None) => Vec::new(),
        };
        let context = context_or_placeholder(&sample);
        let request = GenerationRequest::new(summary_instruction(&context))
            .with_temperature(self.config.summary_temperature);
        let summary = self.generate(&request, "summary").await?;

        info!(file = %workspace.document().file_name, sampled = sample.len(), "generated summary");
        workspace.set_summary(summary.clone());
        Ok(summary)
    }

    /// Answer a question using only the chunks most similar to it.
    ///
    /// Returns the model's reply verbatim.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidInput`] for an empty or whitespace-only question,
    ///   whatever the workspace state
    /// - [`RagError::WorkspaceNotReady`] if nothing has been indexed
    /// - embedding or generation provider errors
    pub async fn ask(&self, session: &Session, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::InvalidInput("question is required".to_string()));
        }

        let workspace = session.require_workspace()?;
        let results =
            self.retrieval.retrieve(workspace, question, self.config.answer_top_k).await?;
        let passages: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let context = context_or_placeholder(&passages);

        let request = GenerationRequest::new(answer_instruction(&context))
            .with_user(question)
            .with_temperature(self.config.answer_temperature);
        let answer = self.generate(&request, "answer").await?;

        info!(retrieved = results.len(), "answered question");
        Ok(answer)
    }

    /// Generate up to `num_questions` multiple-choice questions from the
    /// opening chunks of the document.
    ///
    /// Malformed blocks in the model's reply are dropped, so the result may
    /// hold fewer items than requested.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidInput`] if `num_questions` is zero
    /// - [`RagError::WorkspaceNotReady`] if nothing has been indexed
    /// - generation provider errors
    pub async fn generate_quiz(
        &self,
        session: &Session,
        num_questions: usize,
    ) -> Result<Vec<QuizItem>> {
        if num_questions == 0 {
            return Err(RagError::InvalidInput(
                "number of questions must be greater than zero".to_string(),
            ));
        }

        let workspace = session.require_workspace()?;
        let store = workspace.ready_store().await?;
        let sample = store.sample(self.config.quiz_sample_size).await?;
        let context = context_or_placeholder(&sample);

        let request = GenerationRequest::new(quiz_instruction(&context, num_questions))
            .with_temperature(self.config.quiz_temperature);
        let reply = self.generate(&request, "quiz").await?;

        let items = parse_quiz(&reply);
        if items.len() < num_questions {
            warn!(requested = num_questions, parsed = items.len(), "quiz reply had fewer usable questions");
        }
        info!(requested = num_questions, parsed = items.len(), "generated quiz");
        Ok(items)
    }

    /// Discard the session's document and vector store. Never fails.
    pub fn reset_workspace(&self, session: &mut Session) {
        self.workspaces.reset(session);
    }

    async fn generate(&self, request: &GenerationRequest, task: &'static str) -> Result<String> {
        let provider = self.generation_provider.name();
        debug!(provider, task, temperature = request.temperature, "calling generation provider");
        self.generation_provider.generate(request).await.map_err(|e| {
            error!(provider, task, error = %e, "generation failed");
            e
        })
    }
}

/// Builder for constructing a [`RagOrchestrator`].
///
/// `config`, `embedding_provider` and `generation_provider` are required. The
/// chunker defaults to a [`WhitespaceChunker`] sized from the config.
#[derive(Default)]
pub struct RagOrchestratorBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
}

impl RagOrchestratorBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the generation provider.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Build the [`RagOrchestrator`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing, or
    /// [`RagError::Chunking`] if the default chunker cannot be built from
    /// the config.
    pub fn build(self) -> Result<RagOrchestrator> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let generation_provider = self
            .generation_provider
            .ok_or_else(|| RagError::Config("generation_provider is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(WhitespaceChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(RagOrchestrator {
            workspaces: WorkspaceManager::new(config.store_root.clone()),
            indexer: Indexer::new(embedding_provider.clone(), config.embed_batch_size),
            retrieval: RetrievalEngine::new(embedding_provider.clone()),
            config,
            chunker,
            embedding_provider,
            generation_provider,
        })
    }
}
