//! Typed errors for the extraction engine.
//!
//! Model failures never leave the engine: they are converted into a
//! pattern-only result and reported through [`crate::ExtractionSource`].
//! Only input problems reach the caller.

use thiserror::Error;

/// Errors surfaced to callers of the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Raw name was empty or whitespace only
    #[error("invalid input: {reason}")]
    InputInvalid { reason: String },
}

/// Failures of the text-generation service, recovered locally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Transport failure, timeout, quota rejection or provider error
    #[error("model service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response arrived but was not the expected JSON shape
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl From<openai_client::OpenAIError> for ModelError {
    fn from(err: openai_client::OpenAIError) -> Self {
        if err.is_transport() {
            ModelError::ServiceUnavailable(err.to_string())
        } else {
            ModelError::MalformedResponse(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
