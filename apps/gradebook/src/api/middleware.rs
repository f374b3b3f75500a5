//! # Middleware Module
//!
//! Rate limiting for the gradebook HTTP API.
//!
//! ## Configuration
//!
//! Rate limiting is configured via environment variable:
//! - `GRADEBOOK_RATE_LIMIT`: Requests per second (unset or 0: disabled)

use super::error::ApiError;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Quota used when a limiter is built with zero requests per second.
const DEFAULT_RPS: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Environment variable holding the rate limit.
const RATE_LIMIT_ENV: &str = "GRADEBOOK_RATE_LIMIT";

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a new global rate limiter. Zero falls back to the default quota.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(DEFAULT_RPS);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Get rate limit from environment variable.
///
/// Returns the value of `GRADEBOOK_RATE_LIMIT`, or 0 (no limiter) if unset
/// or unparsable.
pub fn get_rate_limit_from_env() -> u32 {
    rate_limit_from_value(std::env::var(RATE_LIMIT_ENV).ok().as_deref())
}

fn rate_limit_from_value(value: Option<&str>) -> u32 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Rate limiting middleware.
///
/// Returns 429 with a JSON error body once the global quota is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match limiter.check() {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded");
            Err(ApiError::TooManyRequests("Too Many Requests".to_string()))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rate_limiter() {
        let limiter = create_rate_limiter(50);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_create_rate_limiter_zero_defaults() {
        let limiter = create_rate_limiter(0);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_quota_is_enforced() {
        let limiter = create_rate_limiter(1);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_rate_limit_parsing() {
        assert_eq!(rate_limit_from_value(None), 0);
        assert_eq!(rate_limit_from_value(Some("0")), 0);
        assert_eq!(rate_limit_from_value(Some("250")), 250);
        assert_eq!(rate_limit_from_value(Some("lots")), 0);
    }
}
