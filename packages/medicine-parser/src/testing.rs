//! Testing utilities.
//!
//! [`MockModel`] stands in for the model service so extraction logic can be
//! exercised without network calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::ModelError;
use crate::model::{CompletionModel, CompletionRequest};
use crate::prompts::DURATION_SYSTEM_PROMPT;

/// A scripted [`CompletionModel`].
///
/// Replies are keyed on the exact medicine string embedded in the prompt.
/// Unscripted component requests fail with `ServiceUnavailable`; unscripted
/// duration requests answer `unknown`.
#[derive(Default)]
pub struct MockModel {
    /// Component replies by medicine name
    components: Vec<(String, String)>,

    /// Duration replies by medicine name
    durations: Vec<(String, String)>,

    /// Substrings that make any request fail
    failing: Vec<String>,

    /// Duration requests still to fail before replies resume
    duration_failures: Arc<AtomicUsize>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to the components prompt for `medicine` with `response`.
    pub fn with_components(mut self, medicine: impl Into<String>, response: impl Into<String>) -> Self {
        self.components.push((medicine.into(), response.into()));
        self
    }

    /// Reply to the duration prompt for `medicine` with `response`.
    pub fn with_duration(mut self, medicine: impl Into<String>, response: impl Into<String>) -> Self {
        self.durations.push((medicine.into(), response.into()));
        self
    }

    /// Fail every request whose prompt contains `needle`.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    /// Fail the next `count` duration requests, then answer normally.
    pub fn failing_durations(self, count: usize) -> Self {
        self.duration_failures.store(count, Ordering::SeqCst);
        self
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or_default()
    }

    /// Number of narrow duration queries received.
    pub fn duration_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.system == DURATION_SYSTEM_PROMPT)
            .count()
    }

    fn lookup<'a>(replies: &'a [(String, String)], prompt: &str) -> Option<&'a str> {
        replies
            .iter()
            .find(|(medicine, _)| prompt.contains(&format!("\"{}\"", medicine)))
            .map(|(_, reply)| reply.as_str())
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(request.clone());
        }

        if self.failing.iter().any(|needle| request.user.contains(needle)) {
            return Err(ModelError::ServiceUnavailable("mock failure".into()));
        }

        if request.system == DURATION_SYSTEM_PROMPT {
            let failed = self
                .duration_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(ModelError::ServiceUnavailable("mock duration failure".into()));
            }
            return Ok(Self::lookup(&self.durations, &request.user)
                .unwrap_or("unknown")
                .to_string());
        }

        Self::lookup(&self.components, &request.user)
            .map(str::to_string)
            .ok_or_else(|| ModelError::ServiceUnavailable("no scripted response".into()))
    }
}
