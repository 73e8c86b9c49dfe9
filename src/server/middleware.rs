use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::AppState;
use crate::metrics::RateLimitMetrics;
use crate::ratelimit::RateLimitResult;

/// Key used when the peer address is unknown (e.g. in-process tests)
const UNKNOWN_CLIENT: &str = "unknown";

/// Peer IP recorded by `into_make_service_with_connect_info`
fn client_key(req: &Request<Body>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Per-client rate limiting for every route.
///
/// Allowed responses carry `X-RateLimit-*` headers; denied requests get 429
/// with `Retry-After`.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.rate_limiter.is_enabled() {
        return next.run(req).await;
    }

    let client = client_key(&req);
    match state.rate_limiter.check(&client) {
        RateLimitResult::Allowed {
            remaining,
            limit,
            reset_at,
        } => {
            RateLimitMetrics::record_allowed();
            let mut response = next.run(req).await;

            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
            headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_at));

            response
        }
        RateLimitResult::Denied {
            retry_after,
            limit,
            reset_at,
        } => {
            RateLimitMetrics::record_denied();
            tracing::warn!(client = %client, retry_after = retry_after, "Rate limit exceeded");
            rate_limit_response(retry_after, limit, reset_at)
        }
    }
}

fn rate_limit_response(retry_after: u64, limit: u32, reset_at: i64) -> Response {
    let body = json!({
        "error": "Too many requests",
        "message": format!("Too many requests, please retry after {} seconds", retry_after)
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert("Retry-After", HeaderValue::from(retry_after));
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_at));

    response
}
