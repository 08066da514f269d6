//! The extraction engine.
//!
//! One object owns everything extraction needs: compiled patterns, the
//! (throttled) model handle and the result cache. Construct it once and
//! share it behind an `Arc`.
//!
//! Resolution order for a single raw name:
//!
//! 1. Cache hit on the exact string.
//! 2. Model extraction. Missing strength or formulation is filled from the
//!    patterns; a missing name falls back to the pattern-derived name.
//! 3. If the model call fails or its reply cannot be read, the pattern
//!    result replaces the model result entirely.
//!
//! Patches additionally resolve a wear time: explicit text first, then the
//! model's `duration` field, then a narrow follow-up question.

use std::sync::Arc;

use openai_client::OpenAIClient;
use tracing::{debug, info, warn};

use crate::cache::LruCache;
use crate::config::EngineConfig;
use crate::duration::normalize_duration;
use crate::error::{ModelError, ParseError, Result};
use crate::llm::{LanguageModelExtractor, ModelFields};
use crate::model::{CompletionModel, OpenAIModel};
use crate::patterns::{is_patch, MedicinePatterns};
use crate::throttle::ThrottledModel;
use crate::types::{
    Extraction, ExtractionResult, ExtractionSource, FallbackReason, MedicineInput, ParsedMedicine,
};

pub struct MedicineParser {
    patterns: MedicinePatterns,
    llm: LanguageModelExtractor,
    cache: LruCache<ExtractionResult>,
}

impl MedicineParser {
    /// Build an engine around any model service.
    pub fn new(model: Arc<dyn CompletionModel>, config: EngineConfig) -> Self {
        let throttled: Arc<dyn CompletionModel> = Arc::new(ThrottledModel::new(
            model,
            config.upstream_requests_per_second,
        ));

        Self {
            patterns: MedicinePatterns::new(),
            llm: LanguageModelExtractor::new(throttled, config.max_tokens),
            cache: LruCache::new(config.cache_capacity),
        }
    }

    /// Build an engine around an OpenAI-compatible client.
    pub fn with_client(client: OpenAIClient, config: EngineConfig) -> Self {
        let model = Arc::new(OpenAIModel::new(client, config.model.clone()));
        Self::new(model, config)
    }

    pub fn patterns(&self) -> &MedicinePatterns {
        &self.patterns
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Extract fields from one raw name.
    ///
    /// Model failures are recovered here and reported through
    /// [`Extraction::source`]; only an empty name is an error.
    pub async fn extract(&self, raw: &str) -> Result<Extraction> {
        if raw.trim().is_empty() {
            return Err(ParseError::InputInvalid {
                reason: "medicine name is empty".to_string(),
            });
        }

        if let Some(result) = self.cache.get(raw) {
            debug!(medicine = raw, "Extraction cache hit");
            return Ok(Extraction {
                result,
                source: ExtractionSource::Cache,
            });
        }

        let (resolved, source) = match self.llm.extract_fields(raw).await {
            Ok(fields) => (self.merge_model_fields(raw, fields).await, ExtractionSource::Model),
            Err(err) => {
                let reason = match err {
                    ModelError::ServiceUnavailable(_) => FallbackReason::ServiceUnavailable,
                    ModelError::MalformedResponse(_) => FallbackReason::MalformedModelResponse,
                };
                warn!(
                    medicine = raw,
                    error = %err,
                    reason = ?reason,
                    "Model extraction failed, using patterns only"
                );
                (
                    self.resolve_patterns(raw).await,
                    ExtractionSource::PatternFallback(reason),
                )
            }
        };

        // An unreachable service is transient; don't pin a result it shaped.
        let result = resolved.result;
        let transient = resolved.transient
            || source == ExtractionSource::PatternFallback(FallbackReason::ServiceUnavailable);
        if !transient {
            self.cache.insert(raw, result.clone());
        }

        Ok(Extraction { result, source })
    }

    /// Pattern-only extraction, including the patch duration lookup.
    ///
    /// The model's structured reply is unavailable on this path, so the
    /// duration cascade skips straight from explicit text to the narrow
    /// follow-up question.
    pub async fn extract_patterns(&self, raw: &str) -> ExtractionResult {
        self.resolve_patterns(raw).await.result
    }

    async fn resolve_patterns(&self, raw: &str) -> Resolved {
        let matched = self.patterns.extract(raw);
        let duration = self.patch_duration(raw, None).await;

        Resolved {
            transient: duration.transient,
            result: ExtractionResult {
                name: matched.name,
                strength: matched.strength,
                formulation: matched.formulation,
                duration: duration.value,
            },
        }
    }

    /// Extract one input and assemble its output record.
    pub async fn parse_medicine(&self, input: &MedicineInput) -> Result<ParsedMedicine> {
        validate_input(input)?;
        let extraction = self.extract(&input.raw_name).await?;
        debug!(
            vpid = %input.id,
            source = %extraction.source,
            "Parsed medicine"
        );
        Ok(ParsedMedicine::new(input, extraction.result))
    }

    /// Process a list of inputs in order.
    ///
    /// Every input is validated before any extraction runs. A model failure
    /// on one item degrades that item to the pattern result and the batch
    /// carries on.
    pub async fn process_batch(&self, medicines: &[MedicineInput]) -> Result<Vec<ParsedMedicine>> {
        for input in medicines {
            validate_input(input)?;
        }

        info!(count = medicines.len(), "Processing medicine batch");

        let mut parsed = Vec::with_capacity(medicines.len());
        let mut fallbacks = 0usize;

        for (index, input) in medicines.iter().enumerate() {
            let extraction = self.extract(&input.raw_name).await?;
            if extraction.source.is_fallback() {
                fallbacks += 1;
            }
            debug!(
                index,
                vpid = %input.id,
                source = %extraction.source,
                "Batch item parsed"
            );
            parsed.push(ParsedMedicine::new(input, extraction.result));
        }

        info!(
            count = parsed.len(),
            fallbacks,
            "Medicine batch complete"
        );

        Ok(parsed)
    }

    async fn merge_model_fields(&self, raw: &str, fields: ModelFields) -> Resolved {
        let strength = fields
            .strength
            .unwrap_or_else(|| self.patterns.strength(raw).unwrap_or_default().to_string());
        let formulation = fields
            .formulation
            .unwrap_or_else(|| self.patterns.formulation(raw).unwrap_or_default().to_string());
        let name = fields
            .name
            .unwrap_or_else(|| self.patterns.extract(raw).name);

        let duration = self.patch_duration(raw, fields.duration.as_deref()).await;

        Resolved {
            transient: duration.transient,
            result: ExtractionResult {
                name,
                strength,
                formulation,
                duration: duration.value,
            },
        }
    }

    /// Wear time for patches, `None` for anything else.
    async fn patch_duration(&self, raw: &str, model_duration: Option<&str>) -> PatchDuration {
        if !is_patch(raw) {
            return PatchDuration {
                value: None,
                transient: false,
            };
        }
        let (value, transient) = self.resolve_duration(raw, model_duration).await;
        PatchDuration {
            value: Some(value),
            transient,
        }
    }

    /// Explicit text, then the model's field, then a follow-up question.
    /// The first tier that yields a normalized value wins.
    ///
    /// The flag is set when the follow-up question failed because the
    /// service was unreachable.
    async fn resolve_duration(&self, raw: &str, model_duration: Option<&str>) -> (String, bool) {
        if let Some(explicit) = self.patterns.explicit_duration(raw) {
            let duration = normalize_duration(explicit);
            if !duration.is_empty() {
                debug!(medicine = raw, duration = %duration, "Duration from text");
                return (duration, false);
            }
        }

        if let Some(supplied) = model_duration {
            let duration = normalize_duration(supplied);
            if !duration.is_empty() {
                debug!(medicine = raw, duration = %duration, "Duration from model response");
                return (duration, false);
            }
        }

        match self.llm.query_patch_duration(raw).await {
            Ok(duration) => (duration, false),
            Err(err) => {
                warn!(medicine = raw, error = %err, "Patch duration query failed");
                let transient = matches!(err, ModelError::ServiceUnavailable(_));
                (String::new(), transient)
            }
        }
    }
}

/// An extraction result before caching.
struct Resolved {
    result: ExtractionResult,
    /// Shaped by a transient service failure; must not be cached
    transient: bool,
}

struct PatchDuration {
    value: Option<String>,
    transient: bool,
}

fn validate_input(input: &MedicineInput) -> Result<()> {
    if input.raw_name.trim().is_empty() {
        return Err(ParseError::InputInvalid {
            reason: format!("medicine name is empty for VPID {}", input.id),
        });
    }
    Ok(())
}
