//! Text-generation service seam.
//!
//! The engine only needs "send a system and user prompt, get text back".
//! [`OpenAIModel`] implements that over any OpenAI-compatible provider;
//! tests use [`crate::testing::MockModel`].

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use crate::error::ModelError;

/// One prompt sent to the model service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    /// Request a single JSON object as the reply
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
            json_output: false,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// A text-generation service.
///
/// Implementations must sample deterministically (temperature 0) and
/// bound every call with a timeout, reporting it as
/// [`ModelError::ServiceUnavailable`].
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError>;
}

/// [`CompletionModel`] backed by an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model: String,
}

impl OpenAIModel {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionModel for OpenAIModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        let mut chat = ChatRequest::new(&self.model)
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(0.0)
            .max_tokens(request.max_tokens);
        if request.json_output {
            chat = chat.json_object();
        }

        let response = self.client.chat_completion(chat).await?;
        Ok(response.content)
    }
}
