//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store ping)
//!
//! # Catalog
//! GET  /lessons                - All lessons
//! GET  /search?q=<text>        - Lessons whose subject or location contains text
//! PUT  /lessons/{id}           - Merge fields (usually `spaces`) into a lesson
//!
//! # Orders
//! POST /orders                 - Create an order, returns its id
//!
//! # Assets
//! GET  /images/{file}          - Lesson image (basename-only lookup)
//! ```

pub mod health;
pub mod images;
pub mod lessons;
pub mod orders;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/lessons", get(lessons::index))
        .route("/lessons/{id}", put(lessons::update))
        .route("/search", get(lessons::search))
        .route("/orders", post(orders::create))
        .route("/images/{file}", get(images::show))
}

/// Build the CORS layer for the single-page catalog UI.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = origin
        .and_then(|o| o.parse().ok())
        .map_or_else(AllowOrigin::any, AllowOrigin::exact);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application: routes, state and middleware.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_origin.as_deref());

    routes()
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
