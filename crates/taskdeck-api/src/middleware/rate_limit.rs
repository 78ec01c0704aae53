//! Global (not per-client) request rate limiting.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

use crate::config::RateLimitConfig;
use crate::{ApiError, AppState};

pub type GlobalRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Allow `requests` per `period`, with bursts up to the full quota.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Option<Arc<GlobalRateLimiter>> {
    let period = config.period / config.requests.get();
    let quota = Quota::with_period(period)?.allow_burst(config.requests);
    Some(Arc::new(RateLimiter::direct(quota)))
}

/// Reject with 429 once the global quota is exhausted. Passes through when
/// rate limiting is disabled.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", component = "rate_limit", "Rate limit exceeded");
            return Err(ApiError::TooManyRequests);
        }
    }
    Ok(next.run(request).await)
}
