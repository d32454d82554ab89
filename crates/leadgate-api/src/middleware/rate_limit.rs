//! Fixed-window rate limiting
//!
//! Per-client fixed-window counters gate the submit and chat endpoints. The
//! store is behind the `RateLimitStore` trait so the in-memory single-process
//! implementation and a shared external one are interchangeable; the default
//! implementation here is advisory only - a restart silently resets all
//! counters, which is an accepted limitation, not a security boundary.
//!
//! # Headers
//! - `X-RateLimit-Limit`: attempts allowed per window
//! - `X-RateLimit-Remaining`: attempts left in the current window
//! - `X-RateLimit-Reset`: epoch seconds when the window resets
//! - `Retry-After`: seconds until reset (only on 429 responses)

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use leadgate_core::AppError;
use tokio::sync::Mutex;

use crate::error::HttpAppError;
use crate::utils::client_ip::client_key;

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Epoch milliseconds when the current window resets.
    pub reset_at_ms: u64,
    /// Whole seconds until reset, rounded up; meaningful on denial.
    pub retry_after_secs: u64,
}

/// Injectable rate-limit state store.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one attempt for `key` and decide whether it is allowed.
    async fn check(&self, key: &str) -> RateLimitDecision;

    /// Drop expired windows to bound memory. Runs on a timer, independent of
    /// request traffic.
    async fn sweep(&self);
}

/// Per-key window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at_ms: u64,
    #[allow(dead_code)] // kept for operator debugging via logs
    first_attempt_ms: u64,
}

/// In-memory fixed-window counter per client key.
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
    window_ms: u64,
    max_attempts: u32,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl FixedWindowLimiter {
    pub fn new(window_ms: u64, max_attempts: u32) -> Self {
        FixedWindowLimiter {
            windows: Mutex::new(HashMap::new()),
            window_ms,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Check with an explicit clock, so the window arithmetic is testable
    /// without sleeping.
    pub async fn check_at(&self, key: &str, now_ms: u64) -> RateLimitDecision {
        let mut windows = self.windows.lock().await;

        let window = match windows.get_mut(key) {
            Some(window) if now_ms <= window.reset_at_ms => {
                window.count += 1;
                *window
            }
            // No window yet, or the previous one expired: start fresh.
            _ => {
                let window = Window {
                    count: 1,
                    reset_at_ms: now_ms + self.window_ms,
                    first_attempt_ms: now_ms,
                };
                windows.insert(key.to_string(), window);
                window
            }
        };

        let allowed = window.count <= self.max_attempts;
        let retry_after_secs = (window.reset_at_ms.saturating_sub(now_ms)).div_ceil(1000);
        RateLimitDecision {
            allowed,
            remaining: self.max_attempts.saturating_sub(window.count),
            reset_at_ms: window.reset_at_ms,
            retry_after_secs,
        }
    }
}

#[async_trait]
impl RateLimitStore for FixedWindowLimiter {
    async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, now_ms()).await
    }

    async fn sweep(&self) {
        let now = now_ms();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_key, window| window.reset_at_ms >= now);
        let removed = before - windows.len();
        if removed > 0 {
            tracing::debug!(removed, "Swept expired rate-limit windows");
        }
    }
}

/// Spawn the periodic sweep task over all limiters. Runs for the lifetime of
/// the process.
pub fn spawn_sweeper(
    stores: Vec<Arc<dyn RateLimitStore>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; skip it so the sweep cadence starts
        // one interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            for store in &stores {
                store.sweep().await;
            }
        }
    })
}

fn set_header(response: &mut Response, name: &'static str, value: String) {
    if let Ok(header_value) = HeaderValue::from_str(&value) {
        response.headers_mut().insert(name, header_value);
    }
}

/// Rate limiting middleware: gates the request before any validation or I/O.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let socket_addr = request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0);
    let key = client_key(request.headers(), socket_addr.as_ref());

    let decision = limiter.check(&key).await;
    let limit = limiter.max_attempts();

    if decision.allowed {
        let mut response = next.run(request).await;
        set_header(&mut response, "X-RateLimit-Limit", limit.to_string());
        set_header(
            &mut response,
            "X-RateLimit-Remaining",
            decision.remaining.to_string(),
        );
        set_header(
            &mut response,
            "X-RateLimit-Reset",
            decision.reset_at_ms.div_ceil(1000).to_string(),
        );
        return response;
    }

    tracing::warn!(
        client = %key,
        retry_after_secs = decision.retry_after_secs,
        "Rate limit exceeded"
    );

    let mut response = HttpAppError(AppError::RateLimited {
        retry_after_secs: decision.retry_after_secs,
    })
    .into_response();
    set_header(&mut response, "X-RateLimit-Limit", limit.to_string());
    set_header(&mut response, "X-RateLimit-Remaining", "0".to_string());
    set_header(
        &mut response,
        "X-RateLimit-Reset",
        decision.reset_at_ms.div_ceil(1000).to_string(),
    );
    set_header(
        &mut response,
        "Retry-After",
        decision.retry_after_secs.to_string(),
    );
    response
}
