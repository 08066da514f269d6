//! Language-model extraction.
//!
//! Sends the fixed prompts to the model service and turns replies into
//! typed fields. Filling gaps from patterns is the engine's job; this module
//! only reports what the model said, or why it could not be read.

use std::sync::Arc;

use openai_client::strip_code_blocks;
use serde::Deserialize;
use tracing::debug;

use crate::duration::normalize_duration;
use crate::error::ModelError;
use crate::model::{CompletionModel, CompletionRequest};
use crate::prompts::{
    format_components_prompt, format_duration_prompt, COMPONENTS_SYSTEM_PROMPT,
    DURATION_SYSTEM_PROMPT,
};

/// Token budget for the short duration reply.
const DURATION_MAX_TOKENS: u32 = 10;

/// Fields as returned by the model. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModelFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub formulation: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl ModelFields {
    fn without_blanks(self) -> Self {
        Self {
            name: non_blank(self.name),
            strength: non_blank(self.strength),
            formulation: non_blank(self.formulation),
            duration: non_blank(self.duration),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a components reply, tolerating a markdown code fence.
pub fn parse_components_response(response: &str) -> Result<ModelFields, ModelError> {
    let json = strip_code_blocks(response);
    let fields: ModelFields = serde_json::from_str(json)?;
    Ok(fields.without_blanks())
}

/// Extracts fields through the model service.
#[derive(Clone)]
pub struct LanguageModelExtractor {
    model: Arc<dyn CompletionModel>,
    max_tokens: u32,
}

impl LanguageModelExtractor {
    pub fn new(model: Arc<dyn CompletionModel>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// One structured request for name, strength, formulation and duration.
    pub async fn extract_fields(&self, medicine: &str) -> Result<ModelFields, ModelError> {
        let request = CompletionRequest::new(
            COMPONENTS_SYSTEM_PROMPT,
            format_components_prompt(medicine),
            self.max_tokens,
        )
        .json();

        let response = self.model.complete(request).await?;
        debug!(medicine, response = %response, "Model components response");
        parse_components_response(&response)
    }

    /// Narrow follow-up asking only for a patch's wear time.
    ///
    /// Returns the normalized duration, or an empty string when the model
    /// answers "unknown" or something unparseable.
    pub async fn query_patch_duration(&self, medicine: &str) -> Result<String, ModelError> {
        let request = CompletionRequest::new(
            DURATION_SYSTEM_PROMPT,
            format_duration_prompt(medicine),
            DURATION_MAX_TOKENS,
        );

        let response = self.model.complete(request).await?;
        let reply = response.trim().to_lowercase();
        debug!(medicine, reply = %reply, "Model duration response");

        if reply == "unknown" {
            return Ok(String::new());
        }
        Ok(normalize_duration(&reply))
    }
}
