//! Fixed-window rate limiting for the `/api` routes.
//!
//! Client identity is the first `x-forwarded-for` token (or a fallback
//! constant when absent) combined with the request path, so each endpoint
//! gets an independent quota per client. Every `/api` response, allowed or
//! rejected, carries `X-RateLimit-Limit`, `X-RateLimit-Remaining`, and
//! `X-RateLimit-Reset` headers; other paths bypass the limiter entirely.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use analysis::rate_limit::Decision;

use crate::server::app::AppState;
use crate::server::error::ErrorBody;

const RATE_LIMITED_PREFIX: &str = "/api";
const ANONYMOUS_CLIENT: &str = "anonymous";

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with(RATE_LIMITED_PREFIX) {
        return next.run(request).await;
    }

    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string();

    let decision = state
        .rate_limiter
        .check(&analysis::client_key(&ip, &path));

    if !decision.allowed {
        tracing::debug!(%ip, %path, "rate limit exceeded");
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody {
                error: "Too many requests, please try again later".to_string(),
                details: None,
            }),
        )
            .into_response();
        apply_headers(&mut response, &decision);
        return response;
    }

    let mut response = next.run(request).await;
    apply_headers(&mut response, &decision);
    response
}

fn apply_headers(response: &mut Response, decision: &Decision) {
    let headers = response.headers_mut();
    for (name, value) in [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_at_ms.to_string()),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}
