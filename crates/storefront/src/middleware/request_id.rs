//! Request ID middleware for correlating logs, Sentry events and client reports.
//!
//! A checkout is one order request followed by several lesson updates, so the
//! client may send its own `x-request-id` to tie them together. Upstream ids
//! are only trusted when they are short and printable; anything else is
//! replaced with a fresh UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Accept an upstream request id if it is safe to log and echo.
fn accept_upstream(value: &str) -> Option<&str> {
    let ok = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    ok.then_some(value)
}

/// Middleware that ensures every request has a request ID.
///
/// The id is recorded in the current tracing span, set as a Sentry tag and
/// echoed in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_uuid_and_simple_ids() {
        assert!(accept_upstream("3f2b8c1e-0d5a-4c1b-9a7e-2b1f0c9d8e7a").is_some());
        assert!(accept_upstream("checkout.42_a").is_some());
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        assert!(accept_upstream("").is_none());
        assert!(accept_upstream("a b").is_none());
        assert!(accept_upstream("line\nbreak").is_none());
        assert!(accept_upstream(&"x".repeat(MAX_REQUEST_ID_LEN + 1)).is_none());
    }
}
