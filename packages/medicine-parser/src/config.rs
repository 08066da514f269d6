//! Engine configuration.

use std::num::NonZeroU32;

/// Default model served by the Groq endpoint.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Tuning for [`crate::MedicineParser`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Token budget for the components request
    pub max_tokens: u32,

    /// Number of raw names whose results are remembered
    pub cache_capacity: usize,

    /// Sustained rate of upstream model calls. Ten per second matches a
    /// 100ms gap between calls.
    pub upstream_requests_per_second: NonZeroU32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 200,
            cache_capacity: 1000,
            upstream_requests_per_second: NonZeroU32::new(10).expect("default rate must be > 0"),
        }
    }
}

impl EngineConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_upstream_rate(mut self, requests_per_second: NonZeroU32) -> Self {
        self.upstream_requests_per_second = requests_per_second;
        self
    }
}
