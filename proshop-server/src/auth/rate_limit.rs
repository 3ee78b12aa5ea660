//! In-memory rate limiting for the admin login route

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Login attempts allowed per IP inside one window
const LOGIN_MAX_REQUESTS: u32 = 5;
const LOGIN_WINDOW_SECS: u64 = 60;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Client IP: first `X-Forwarded-For` entry, then the peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// 5 login attempts per minute per IP
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    if !state
        .rate_limiter
        .check("login", &ip, LOGIN_MAX_REQUESTS, LOGIN_WINDOW_SECS)
        .await
    {
        tracing::warn!(ip = %ip, "Admin login rate limited");
        return AppError::new(ErrorCode::TooManyRequests).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.check("login", "10.0.0.1", 5, 60).await);
        }
        assert!(!limiter.check("login", "10.0.0.1", 5, 60).await);
        // Other clients are unaffected
        assert!(limiter.check("login", "10.0.0.2", 5, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("login", "10.0.0.1", 1, 60).await);
        assert!(!limiter.check("login", "10.0.0.1", 1, 60).await);

        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("login", "10.0.0.1", 1, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new();
        limiter.check("login", "10.0.0.1", 5, 60).await;
        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert!(limiter.inner.lock().await.is_empty());
    }
}
