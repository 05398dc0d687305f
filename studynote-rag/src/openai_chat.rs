//! OpenAI chat-completions generation provider.
//!
//! This module is only available when the `openai` feature is enabled.

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::generation::{GenerationProvider, GenerationRequest};

/// The default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const PROVIDER: &str = "OpenAI";

fn generation_error(message: impl Into<String>) -> RagError {
    RagError::GenerationService { provider: PROVIDER.into(), message: message.into() }
}

/// A [`GenerationProvider`] backed by OpenAI chat completions.
///
/// Each request is a single non-streaming completion: a system message, an
/// optional user message, and the request temperature.
pub struct OpenAIGenerationProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIGenerationProvider {
    /// Create a provider for the default model (`gpt-4o-mini`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(generation_error("API key must not be empty"));
        }
        let config = OpenAIConfig::new().with_api_key(api_key);
        Ok(Self { client: Client::with_config(config), model: DEFAULT_CHAT_MODEL.into() })
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| generation_error("OPENAI_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

fn build_messages(request: &GenerationRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.as_str())
            .build()
            .map_err(|e| generation_error(format!("failed to build system message: {e}")))?
            .into(),
    ];

    if let Some(user) = &request.user {
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.as_str())
                .build()
                .map_err(|e| generation_error(format!("failed to build user message: {e}")))?
                .into(),
        );
    }

    Ok(messages)
}

#[async_trait]
impl GenerationProvider for OpenAIGenerationProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let messages = build_messages(request)?;
        let completion_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .build()
            .map_err(|e| generation_error(format!("failed to build request: {e}")))?;

        debug!(provider = PROVIDER, model = %self.model, has_user = request.user.is_some(), "chat completion");

        let response = self.client.chat().create(completion_request).await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "chat completion failed");
            generation_error(format!("OpenAI API error: {e}"))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| generation_error("API returned no completion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_only_request_has_one_message() {
        let messages = build_messages(&GenerationRequest::new("summarize")).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn user_turn_follows_system() {
        let request = GenerationRequest::new("answer").with_user("what is a cell?");
        let messages = build_messages(&request).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(OpenAIGenerationProvider::new("").is_err());
    }

    #[test]
    fn name_is_the_provider_not_the_model() {
        let provider = OpenAIGenerationProvider::new("sk-test").unwrap().with_model("gpt-4o");
        assert_eq!(provider.name(), "OpenAI");
    }
}
