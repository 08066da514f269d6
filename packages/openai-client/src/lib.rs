//! OpenAI-compatible chat completions client
//!
//! A minimal client for any provider exposing the OpenAI
//! `/chat/completions` REST surface (OpenAI itself, Groq, local proxies).
//! No domain-specific logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, Message, OpenAIClient};
//!
//! let client = OpenAIClient::groq(std::env::var("GROQ_API_KEY")?);
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("llama-3.1-8b-instant")
//!             .message(Message::user("Reply with a JSON object"))
//!             .temperature(0.0)
//!             .json_object(),
//!     )
//!     .await?;
//! ```

pub mod credentials;
pub mod error;
pub mod types;

pub use credentials::SecretString;
pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat completions client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: SecretString,
    base_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a client against the OpenAI endpoint.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client against Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: impl Into<SecretString>) -> Self {
        Self::new(api_key).with_base_url(GROQ_BASE_URL)
    }

    /// Create from environment variable `GROQ_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| OpenAIError::Config("GROQ_API_KEY not set".into()))?;
        Ok(Self::groq(api_key))
    }

    /// Set a custom base URL (proxies, other compatible providers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Chat completion.
    ///
    /// Returns the content of the first choice.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        if self.api_key.is_empty() {
            return Err(OpenAIError::Config("API key is empty".into()));
        }

        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                if e.is_timeout() {
                    OpenAIError::Timeout(self.timeout)
                } else {
                    OpenAIError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(OpenAIError::RateLimited(error_text));
            }
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: types::ChatResponseRaw = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OpenAIError::Timeout(self.timeout)
            } else {
                OpenAIError::Parse(e.to_string())
            }
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Parse("response contained no message content".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.base_url(), "https://custom.api.com/v1");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_groq_preset_and_redacted_debug() {
        let client = OpenAIClient::groq("gsk-secret");
        assert_eq!(client.base_url(), GROQ_BASE_URL);
        assert!(!format!("{:?}", client).contains("gsk-secret"));
    }

    #[tokio::test]
    async fn test_empty_key_is_config_error() {
        let client = OpenAIClient::groq("");
        let err = client
            .chat_completion(ChatRequest::new("m").message(Message::user("hi")))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAIError::Config(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = OpenAIClient::new("sk-test")
            .with_base_url(format!("http://127.0.0.1:{}", port))
            .with_timeout(Duration::from_secs(2));

        let err = client
            .chat_completion(ChatRequest::new("m").message(Message::user("hi")))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAIError::Network(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts connections via the kernel backlog but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = OpenAIClient::new("sk-test")
            .with_base_url(format!("http://127.0.0.1:{}", port))
            .with_timeout(Duration::from_millis(200));

        let err = client
            .chat_completion(ChatRequest::new("m").message(Message::user("hi")))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAIError::Timeout(_)));
        drop(listener);
    }
}
