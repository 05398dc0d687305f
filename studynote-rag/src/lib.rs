//! # studynote-rag
//!
//! Retrieval-augmented study tools for a single uploaded document.
//!
//! ## Overview
//!
//! A [`Session`] holds one uploaded document at a time. The
//! [`RagOrchestrator`] indexes that document into a per-session vector store
//! and serves three generation tasks from it:
//!
//! - a one-off summary of the document's opening chunks
//! - answers to questions, grounded in the chunks most similar to the question
//! - multiple-choice quizzes parsed into [`QuizItem`]s
//!
//! Index time: text → [`WhitespaceChunker`] → [`EmbeddingProvider`] →
//! [`LocalVectorStore`]. Query time: question → [`EmbeddingProvider`] →
//! [`VectorStore::search`] → [`prompt::build_context`] →
//! [`GenerationProvider`].
//!
//! ## Providers
//!
//! The embedding and language models are external services behind the
//! [`EmbeddingProvider`] and [`GenerationProvider`] traits. With the `openai`
//! feature enabled:
//!
//! | Type | Default model |
//! |------|---------------|
//! | [`openai::OpenAIEmbeddingProvider`] | `text-embedding-3-large` |
//! | [`openai_chat::OpenAIGenerationProvider`] | `gpt-4o-mini` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use studynote_rag::{RagConfig, RagOrchestrator, Session};
//! use studynote_rag::openai::OpenAIEmbeddingProvider;
//! use studynote_rag::openai_chat::OpenAIGenerationProvider;
//!
//! let orchestrator = RagOrchestrator::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_env()?))
//!     .generation_provider(Arc::new(OpenAIGenerationProvider::from_env()?))
//!     .build()?;
//!
//! let mut session = Session::new();
//! let summary = orchestrator.index_and_summarize(&mut session, &text, "lecture.txt").await?;
//! let quiz = orchestrator.generate_quiz(&session, 5).await?;
//! orchestrator.reset_workspace(&mut session);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod local;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "openai")]
pub mod openai_chat;
pub mod orchestrator;
pub mod prompt;
pub mod quiz;
pub mod retrieval;
pub mod vectorstore;
pub mod workspace;

pub use chunking::{Chunker, WhitespaceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, EmbeddedChunk, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::{GenerationProvider, GenerationRequest};
pub use inmemory::InMemoryVectorStore;
pub use local::LocalVectorStore;
pub use orchestrator::{RagOrchestrator, RagOrchestratorBuilder};
pub use quiz::{QuizItem, parse_quiz};
pub use retrieval::{Indexer, RetrievalEngine};
pub use vectorstore::VectorStore;
pub use workspace::{Session, Workspace, WorkspaceManager, WorkspaceState};
