//! Middleware stack shared by every handler.
//!
//! # Layers (outermost first)
//! - `x-request-id`: generated (UUID v4) when missing
//! - `TraceLayer`: one span per request, tagged with the request ID
//! - `x-request-id` propagated onto the response
//! - optional per-request timeout (`408 Request Timeout`)

use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handler::handler_router;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the application router for `config`.
pub fn build_router(config: &ServerConfig) -> Router {
    build_router_with(handler_router(), config.request_timeout())
}

/// Wrap any handler router with the standard middleware stack.
#[allow(deprecated)]
pub fn build_router_with(router: Router, request_timeout: Option<Duration>) -> Router {
    let router = match request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
        None => router,
    };

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
