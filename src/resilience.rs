//! Request rate limiting and timeouts.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Request timeout when timeouts are enabled.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token bucket shared by every page and API request of the process.
///
/// Holds `burst_size` tokens at most and refills `rate_per_sec` per second.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    rate_per_sec: f32,
    burst_size: f32,
}

#[derive(Debug)]
struct Bucket {
    tokens: f32,
    refilled_at: Instant,
}

impl RateLimiter {
    pub fn new(rate_per_sec: f32, burst_size: f32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: burst_size,
                refilled_at: Instant::now(),
            }),
            rate_per_sec,
            burst_size,
        }
    }

    /// Take one token, returning `false` when the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.refilled_at).as_secs_f32();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst_size);
        bucket.refilled_at = now;

        if bucket.tokens < 1.0 {
            return false;
        }
        bucket.tokens -= 1.0;
        true
    }
}

/// Middleware rejecting requests once the bucket is empty.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if state.config.resilience.rate_limit_enabled && !state.rate_limiter.try_acquire() {
        tracing::warn!(name: "http.rate_limited", path = %req.uri().path(), "Rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }
    Ok(next.run(req).await)
}

/// Middleware bounding request handling time.
///
/// Event streams are exempt since they stay open for the page's lifetime.
pub async fn timeout_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if state.config.resilience.timeout_disabled || req.uri().path().ends_with("/events") {
        return next.run(req).await;
    }
    match tokio::time::timeout(REQUEST_TIMEOUT, next.run(req)).await {
        Ok(res) => res,
        Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_refill() {
        let limiter = RateLimiter::new(2.0, 3.0);

        for _ in 0..3 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());

        // 600ms at 2/s refills a little over one token
        std::thread::sleep(Duration::from_millis(600));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
