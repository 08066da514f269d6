//! Error types for the chat completions client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Chat completions client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the client timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Provider quota exhausted (HTTP 429)
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Whether the failure happened on the way to or at the provider,
    /// as opposed to a response that arrived but could not be read.
    pub fn is_transport(&self) -> bool {
        !matches!(self, OpenAIError::Parse(_))
    }
}
