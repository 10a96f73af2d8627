/*!
 * # Rate Limiting
 *
 * Fixed-window request limiter keyed per client. Authenticated requests
 * are counted per user id, anonymous ones per IP address. State lives in
 * an in-memory [`DashMap`], which is sufficient for a single-instance
 * deployment.
 */
use axum::{extract::Request, http::StatusCode, response::Response};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::auth::AuthUser;

/// Converts a number to a header value. Numeric strings are always
/// valid ASCII, so the fallback can never fire in practice.
fn num_to_header_value<T: ToString>(n: T) -> http::HeaderValue {
    http::HeaderValue::from_str(&n.to_string())
        .unwrap_or_else(|_| http::HeaderValue::from_static("0"))
}

#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            count: 0,
            window_start: Instant::now(),
        }
    }

    fn increment(&mut self, window_duration: Duration) {
        let now = Instant::now();
        if now.duration_since(self.window_start) >= window_duration {
            self.count = 1;
            self.window_start = now;
        } else {
            self.count += 1;
        }
    }

    fn time_until_reset(&self, window_duration: Duration) -> Duration {
        window_duration.saturating_sub(self.window_start.elapsed())
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_window: u32,
    pub window_duration: Duration,
    pub enable_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 100,
            window_duration: Duration::from_secs(60),
            enable_headers: true,
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, RateLimitEntry>>,
    config: RateLimitConfig,
}

#[derive(Debug)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_time: Duration,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn check_rate_limit(&self, key: &str) -> RateLimitResult {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(RateLimitEntry::new);

        entry.increment(self.config.window_duration);

        let allowed = entry.count <= self.config.requests_per_window;
        let remaining = self.config.requests_per_window.saturating_sub(entry.count);
        let reset_time = entry.time_until_reset(self.config.window_duration);

        RateLimitResult {
            allowed,
            limit: self.config.requests_per_window,
            remaining,
            reset_time,
        }
    }

    /// Drops entries whose window has passed. Run periodically.
    pub fn cleanup_expired(&self) {
        let window = self.config.window_duration;
        self.entries
            .retain(|_, entry| entry.window_start.elapsed() < window);
    }
}

/// Picks the counting key: user id when the auth middleware ran first,
/// otherwise the client IP from proxy headers.
fn extract_key(request: &Request) -> String {
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return format!("ip:{}", ip.trim());
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return format!("ip:{}", ip_str);
        }
    }

    "ip:unknown".to_string()
}

// Layer implementation for tower
#[derive(Clone)]
pub struct RateLimitLayer {
    rate_limiter: RateLimiter,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            rate_limiter: RateLimiter::new(config),
        }
    }

    pub fn limiter(&self) -> RateLimiter {
        self.rate_limiter.clone()
    }
}

impl<S> tower::Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            rate_limiter: self.rate_limiter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    rate_limiter: RateLimiter,
}

impl<S> tower::Service<Request> for RateLimitService<S>
where
    S: tower::Service<Request, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<axum::body::Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let rate_limiter = self.rate_limiter.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = request.uri().path().to_string();
            if path.starts_with("/health") || path.starts_with("/docs") || path.starts_with("/api-docs")
            {
                return inner.call(request).await;
            }

            let key = extract_key(&request);
            let result = rate_limiter.check_rate_limit(&key);

            if !result.allowed {
                warn!("Rate limit exceeded for key: {}", key);

                let body = serde_json::json!({
                    "status": "error",
                    "message": "Too many requests, please slow down",
                    "code": "RATE_LIMITED",
                })
                .to_string();

                let mut response = Response::new(axum::body::Body::from(body));
                *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;

                let headers = response.headers_mut();
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("application/json"),
                );
                if rate_limiter.config.enable_headers {
                    headers.insert("X-RateLimit-Limit", num_to_header_value(result.limit));
                    headers.insert("X-RateLimit-Remaining", num_to_header_value(0));
                    headers.insert(
                        "X-RateLimit-Reset",
                        num_to_header_value(result.reset_time.as_secs()),
                    );
                }

                return Ok(response);
            }

            let mut response = inner.call(request).await?;

            if rate_limiter.config.enable_headers {
                let headers = response.headers_mut();
                headers.insert("X-RateLimit-Limit", num_to_header_value(result.limit));
                headers.insert("X-RateLimit-Remaining", num_to_header_value(result.remaining));
                headers.insert(
                    "X-RateLimit-Reset",
                    num_to_header_value(result.reset_time.as_secs()),
                );
            }

            Ok(response)
        })
    }
}

// Background cleanup task
pub async fn start_cleanup_task(rate_limiter: RateLimiter, interval: Duration) {
    let mut interval_timer = tokio::time::interval(interval);

    loop {
        interval_timer.tick().await;
        rate_limiter.cleanup_expired();
        debug!("Rate limiter cleanup completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests_per_window: limit,
            window_duration: Duration::from_secs(60),
            enable_headers: true,
        })
    }

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let limiter = limiter(2);

        assert!(limiter.check_rate_limit("test_key").allowed);
        assert!(limiter.check_rate_limit("test_key").allowed);
        assert!(!limiter.check_rate_limit("test_key").allowed);
    }

    #[test]
    fn keys_are_counted_independently() {
        let limiter = limiter(1);

        assert!(limiter.check_rate_limit("key1").allowed);
        assert!(limiter.check_rate_limit("key2").allowed);
        assert!(!limiter.check_rate_limit("key1").allowed);
        assert!(!limiter.check_rate_limit("key2").allowed);
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = limiter(5);

        let first = limiter.check_rate_limit("quota");
        assert_eq!(first.remaining, 4);
        let second = limiter.check_rate_limit("quota");
        assert_eq!(second.remaining, 3);
    }

    #[test]
    fn cleanup_keeps_active_windows() {
        let limiter = limiter(5);
        limiter.check_rate_limit("active");
        limiter.cleanup_expired();
        assert_eq!(limiter.entries.len(), 1);
    }
}
