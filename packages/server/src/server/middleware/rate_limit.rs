// Per-caller rate limiting using governor keyed limiters
//
// Configuration:
// - GET /parse/:vpid: 10 requests per minute per authenticated user
// - POST /parse/batch: 2 requests per minute per authenticated user
//
// Applied in app.rs as a route layer after require_auth, so the caller is
// always known when the limiter runs.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use tracing::warn;

use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Token bucket per caller, refilled over one minute.
pub struct CallerRateLimiter {
    limiter: KeyedLimiter,
    clock: DefaultClock,
}

impl CallerRateLimiter {
    pub fn per_minute(requests: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(requests)),
            clock: DefaultClock::default(),
        }
    }

    /// Take one cell for `caller`, or report how long until one is free.
    pub fn check(&self, caller: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&caller.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop state for callers whose buckets have fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }
}

/// Limits for the two extraction endpoints.
#[derive(Clone)]
pub struct RateLimits {
    pub single: Arc<CallerRateLimiter>,
    pub batch: Arc<CallerRateLimiter>,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            single: Arc::new(CallerRateLimiter::per_minute(
                NonZeroU32::new(10).expect("single limit must be > 0"),
            )),
            batch: Arc::new(CallerRateLimiter::per_minute(
                NonZeroU32::new(2).expect("batch limit must be > 0"),
            )),
        }
    }
}

/// Rejects the request with 429 when the caller's bucket is empty.
///
/// Must run after `require_auth`; a request without `AuthUser` is treated
/// as unauthenticated.
pub async fn rate_limit(
    State(limiter): State<Arc<CallerRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return ApiError::AuthInvalid.into_response();
    };

    if let Err(retry_after) = limiter.check(&user.username) {
        warn!(
            user = %user.username,
            path = %request.uri().path(),
            retry_after_ms = retry_after.as_millis() as u64,
            "Rate limit exceeded"
        );
        return ApiError::RateLimited { retry_after }.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_quota_then_rejects() {
        let limiter = CallerRateLimiter::per_minute(NonZeroU32::new(2).unwrap());
        assert!(limiter.check("alice").is_ok());
        assert!(limiter.check("alice").is_ok());

        let wait = limiter.check("alice").unwrap_err();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(30));
    }

    #[test]
    fn test_callers_are_independent() {
        let limiter = CallerRateLimiter::per_minute(NonZeroU32::MIN);
        assert!(limiter.check("alice").is_ok());
        assert!(limiter.check("alice").is_err());
        assert!(limiter.check("bob").is_ok());
    }

    #[test]
    fn test_default_limits() {
        let limits = RateLimits::default();
        for _ in 0..10 {
            assert!(limits.single.check("carol").is_ok());
        }
        assert!(limits.single.check("carol").is_err());

        assert!(limits.batch.check("carol").is_ok());
        assert!(limits.batch.check("carol").is_ok());
        assert!(limits.batch.check("carol").is_err());
    }
}
