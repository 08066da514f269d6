//! Upstream pacing for model calls.
//!
//! Wraps any [`CompletionModel`] in a token bucket so a batch stays under
//! the provider's rate limit. Only real model calls wait; cache hits and
//! pattern-only work are never delayed.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};

use crate::error::ModelError;
use crate::model::{CompletionModel, CompletionRequest};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A model wrapper that enforces a sustained request rate.
pub struct ThrottledModel {
    inner: Arc<dyn CompletionModel>,
    limiter: DirectRateLimiter,
}

impl ThrottledModel {
    /// Allow `requests_per_second` calls, without bursts.
    pub fn new(inner: Arc<dyn CompletionModel>, requests_per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(requests_per_second).allow_burst(NonZeroU32::MIN);
        Self {
            inner,
            limiter: RateLimiter::direct(quota),
        }
    }
}

#[async_trait]
impl CompletionModel for ThrottledModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        self.limiter.until_ready().await;
        self.inner.complete(request).await
    }
}
