//! Rate Limiting Middleware
//!
//! Per-client fixed-window limiting for `/api`. Counters live in process
//! memory, so each server instance enforces its own budget.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::RateLimitSettings;
use crate::infrastructure::metrics;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

/// Information about rate limit status returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the window resets
    pub reset_at: i64,
    /// Seconds until the window resets
    pub retry_after: u64,
}

/// Rate limit exceeded error response.
#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_ms: i64,
    count: u32,
}

/// In-memory fixed-window rate limiter keyed by client identifier.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window_ms: i64,
    message: String,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, message: impl Into<String>) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window_ms: window.as_millis() as i64,
            message: message.into(),
            trust_proxy_headers: false,
        }
    }

    /// Key clients on forwarding headers instead of the peer address.
    pub fn trusting_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(
            settings.max_requests,
            Duration::from_secs(settings.window_seconds),
            settings.message.clone(),
        )
        .trusting_proxy_headers(settings.trust_proxy_headers)
    }

    /// Message sent with 429 responses
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Count a request from `identifier` at `now_ms`.
    ///
    /// Returns `Ok` while the client is within its budget, `Err` once exceeded.
    pub fn check_at(&self, identifier: &str, now_ms: i64) -> Result<RateLimitInfo, RateLimitInfo> {
        let mut entry = self
            .windows
            .entry(identifier.to_string())
            .or_insert(Window {
                started_ms: now_ms,
                count: 0,
            });

        if now_ms - entry.started_ms >= self.window_ms {
            *entry = Window {
                started_ms: now_ms,
                count: 0,
            };
        }

        let reset_ms = entry.started_ms + self.window_ms;
        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        let info = RateLimitInfo {
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at: reset_ms / 1000,
            retry_after: if allowed {
                0
            } else {
                ((reset_ms - now_ms).max(0) as u64).div_ceil(1000)
            },
        };

        if allowed {
            Ok(info)
        } else {
            Err(info)
        }
    }

    pub fn check(&self, identifier: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        self.check_at(identifier, chrono::Utc::now().timestamp_millis())
    }

    /// Drop windows that ended before `now_ms`. Returns how many were removed.
    pub fn prune_at(&self, now_ms: i64) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now_ms - window.started_ms < self.window_ms);
        before - self.windows.len()
    }

    pub fn prune(&self) -> usize {
        self.prune_at(chrono::Utc::now().timestamp_millis())
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Extract the client identifier from a request.
///
/// The peer address is used unless `trust_proxy_headers` is set, in which case
/// the first valid `X-Forwarded-For` entry, then `X-Real-IP`, take precedence.
/// Those headers are client-controlled without a proxy in front.
fn extract_identifier(
    headers: &HeaderMap,
    client_ip: Option<IpAddr>,
    trust_proxy_headers: bool,
) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(headers) {
            return format!("ip:{}", ip);
        }
    }

    match client_ip {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    forwarded_for.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
}

/// Rate limiting middleware for the `/api` routes.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip());
    let identifier = extract_identifier(
        request.headers(),
        client_ip,
        state.rate_limiter.trust_proxy_headers,
    );

    match state.rate_limiter.check(&identifier) {
        Ok(info) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            tracing::warn!(identifier = %identifier, "Rate limit exceeded");
            metrics::record_rate_limited();
            create_rate_limit_response(state.rate_limiter.message(), info)
        }
    }
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(headers: &mut HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Create a 429 Too Many Requests response.
fn create_rate_limit_response(message: &str, info: RateLimitInfo) -> Response {
    let retry_after = info.retry_after;
    let info = RateLimitInfo {
        remaining: 0,
        ..info
    };

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitExceededResponse {
            error: ErrorResponse {
                code: 10006,
                message: message.to_string(),
                errors: None,
            },
            rate_limit: info.clone(),
        }),
    )
        .into_response();

    if let Ok(v) = header::HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, v);
    }
    add_rate_limit_headers(response.headers_mut(), &info);

    response
}
