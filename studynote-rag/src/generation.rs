//! Generation provider trait for instruction-following language models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single non-streaming generation request.
///
/// The system instruction carries the task and the retrieved context; the
/// optional user turn carries the student's question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The system instruction, including any retrieved context.
    pub system: String,
    /// The user turn, when the task has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a system-only request with temperature `0.0`.
    pub fn new(system: impl Into<String>) -> Self {
        Self { system: system.into(), user: None, temperature: 0.0 }
    }

    /// Attach a user turn.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A hosted language model that turns a [`GenerationRequest`] into text.
///
/// Implementations return the model's text verbatim. Failures surface as
/// [`RagError::GenerationService`](crate::RagError::GenerationService);
/// timeouts and retries, if any, belong to the implementation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
