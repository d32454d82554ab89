//! Client identity resolution for rate limiting.
//!
//! Proxy headers are checked in a fixed precedence order before falling back
//! to the socket address. The values are trusted as-is: this feeds the
//! advisory rate limiter, not an authentication decision.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Proxy headers consulted in order. `X-Forwarded-For` may carry a
/// comma-separated chain; only the first (client-most) entry is used.
const IP_HEADERS: [&str; 4] = [
    "x-forwarded-for",
    "x-real-ip",
    "cf-connecting-ip",
    "x-client-ip",
];

/// Resolve the client IP from proxy headers, falling back to the peer socket
/// address, then the literal `"unknown"`.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<&SocketAddr>) -> String {
    for name in IP_HEADERS {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Rate-limiter key for a request.
pub fn client_key(headers: &HeaderMap, peer: Option<&SocketAddr>) -> String {
    format!("ip:{}", resolve_client_ip(headers, peer))
}
