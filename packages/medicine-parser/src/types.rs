//! Input, output and wire types.

use serde::{Deserialize, Serialize};

/// One medicine product to parse, as supplied by the caller.
///
/// Wire form is `{"NM": <raw name>, "VPID": <identifier>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineInput {
    #[serde(rename = "NM")]
    pub raw_name: String,

    /// External vocabulary identifier, passed through unchanged.
    #[serde(rename = "VPID")]
    pub id: String,
}

impl MedicineInput {
    pub fn new(id: impl Into<String>, raw_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_name: raw_name.into(),
        }
    }
}

/// Fields extracted from one raw name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub name: String,
    pub strength: String,
    pub formulation: String,

    /// Wear time, only present for transdermal patches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Where an extraction result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Model response, gaps filled from patterns
    Model,
    /// Previously computed result for the same raw name
    Cache,
    /// Patterns only, because the model path failed
    PatternFallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ServiceUnavailable,
    MalformedModelResponse,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionSource::Model => "model",
            ExtractionSource::Cache => "cache",
            ExtractionSource::PatternFallback(FallbackReason::ServiceUnavailable) => {
                "fallback:service_unavailable"
            }
            ExtractionSource::PatternFallback(FallbackReason::MalformedModelResponse) => {
                "fallback:malformed_response"
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ExtractionSource::PatternFallback(_))
    }
}

impl std::fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extraction result together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub source: ExtractionSource,
}

/// Output record for one input, as returned by the API and batch runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMedicine {
    #[serde(rename = "VPID")]
    pub vpid: String,
    pub original_name: String,
    pub name: String,
    pub strength: String,
    pub formulation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ParsedMedicine {
    pub fn new(input: &MedicineInput, result: ExtractionResult) -> Self {
        Self {
            vpid: input.id.clone(),
            original_name: input.raw_name.clone(),
            name: result.name,
            strength: result.strength,
            formulation: result.formulation,
            duration: result.duration,
        }
    }
}

/// Batch request body: `{"medicines": [{"NM", "VPID"}, ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineList {
    pub medicines: Vec<MedicineInput>,
}

/// Batch response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMedicineList {
    pub medicines: Vec<ParsedMedicine>,
}
