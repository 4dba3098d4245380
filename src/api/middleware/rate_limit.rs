//! Rate limiting middleware backed by the Redis request counter.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        let body = json!({
            "error": {
                "code": "RATE_LIMITED",
                "message": "Too many requests. Please try again later.",
            }
        });

        (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
    }
}

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Count the request and reject it once the window is exhausted.
///
/// Fails closed: an unreachable counter rejects the request.
async fn enforce(
    state: &AppState,
    scope: &str,
    max_requests: u64,
    window_seconds: u64,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client = client_identifier(&request);
    let key = format!("{}:{}", scope, client);

    let status = match state.limiter.hit(&key, max_requests, window_seconds).await {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(error = %e, scope, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: window_seconds,
            });
        }
    };

    if !status.allowed {
        tracing::warn!(client = %client, scope, count = status.count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: window_seconds,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(status.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(status.remaining()));

    Ok(response)
}

/// General limit for the API surface.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        &state,
        "general",
        RATE_LIMIT_REQUESTS,
        RATE_LIMIT_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}

/// Stricter limit for the login endpoint.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        &state,
        "auth",
        RATE_LIMIT_AUTH_REQUESTS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_rate_limit_error_response() {
        let response = RateLimitError { retry_after: 60 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "203.0.113.7");
    }

    #[test]
    fn test_unknown_client() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identifier(&request), "unknown");
    }
}
