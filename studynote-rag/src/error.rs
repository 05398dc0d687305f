//! Error types for the `studynote-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing a document or answering from it.
#[derive(Debug, Error)]
pub enum RagError {
    /// The caller supplied input the operation cannot act on
    /// (an empty question, a zero question count).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No indexed document is available for a retrieval-dependent operation.
    #[error("Workspace not ready: {0}")]
    WorkspaceNotReady(String),

    /// The embedding service failed (network, auth, quota, malformed response).
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingService {
        /// The embedding provider that produced the error.
        provider: String,
        /// The upstream failure description.
        message: String,
    },

    /// The generation service failed.
    #[error("Generation error ({provider}): {message}")]
    GenerationService {
        /// The generation provider that produced the error.
        provider: String,
        /// The upstream failure description.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Chunker parameters are inconsistent.
    #[error("Chunking error: {0}")]
    Chunking(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RagError {
    pub(crate) fn local_store(message: impl Into<String>) -> Self {
        Self::VectorStore { backend: "Local".to_string(), message: message.into() }
    }

    /// Returns `true` for errors caused by the caller rather than by a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::WorkspaceNotReady(_))
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_upstream_message() {
        let err = RagError::GenerationService {
            provider: "OpenAI".into(),
            message: "API returned 429: quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "Generation error (OpenAI): API returned 429: quota exceeded");
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(RagError::InvalidInput("empty".into()).is_client_error());
        assert!(RagError::WorkspaceNotReady("none".into()).is_client_error());
        assert!(!RagError::local_store("disk full").is_client_error());
    }
}
