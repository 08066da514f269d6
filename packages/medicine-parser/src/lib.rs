//! Medicine product name parsing
//!
//! Extracts drug name, strength, formulation and, for transdermal patches,
//! wear time from free-text product names such as
//! `"Generic Aspirin 325mg tablets"`.
//!
//! Extraction is two-tier: a language model is asked first and deterministic
//! patterns fill whatever it leaves out. When the model cannot be reached or
//! its reply cannot be read, the pattern result is used on its own.
//!
//! # Usage
//!
//! ```rust,ignore
//! use medicine_parser::{EngineConfig, MedicineParser};
//! use openai_client::OpenAIClient;
//!
//! let parser = MedicineParser::with_client(OpenAIClient::from_env()?, EngineConfig::default());
//!
//! let extraction = parser.extract("Fentanyl 72 hour transdermal patch").await?;
//! assert_eq!(extraction.result.duration.as_deref(), Some("72 hours"));
//! ```
//!
//! # Modules
//!
//! - [`engine`] - The engine object and batch processing
//! - [`patterns`] - Compiled strength/formulation/duration patterns
//! - [`llm`] - Model prompting and reply parsing
//! - [`model`] - The model service trait and its OpenAI-compatible implementation
//! - [`testing`] - Mock model for tests

pub mod cache;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod llm;
pub mod model;
pub mod patterns;
pub mod prompts;
pub mod testing;
pub mod throttle;
pub mod types;

pub use config::EngineConfig;
pub use duration::normalize_duration;
pub use engine::MedicineParser;
pub use error::{ModelError, ParseError};
pub use llm::{parse_components_response, LanguageModelExtractor, ModelFields};
pub use model::{CompletionModel, CompletionRequest, OpenAIModel};
pub use patterns::{is_patch, MedicinePatterns, PatternMatch};
pub use types::{
    Extraction, ExtractionResult, ExtractionSource, FallbackReason, MedicineInput, MedicineList,
    ParsedMedicine, ParsedMedicineList,
};

pub use testing::MockModel;
