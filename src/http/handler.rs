//! Placeholder request handler.
//!
//! Answers every GET with a fixed plain-text body and rejects every other
//! method. The lifecycle controller does not depend on it; any `Router` can
//! take its place.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};

/// Body returned for GET requests.
pub const PROCESSED_BODY: &str = "Request processed";

/// Body returned for any other method.
pub const METHOD_NOT_ALLOWED_BODY: &str = "only accept GET request";

/// Router that sends every path to [`process_request`].
pub fn handler_router() -> Router {
    Router::new().fallback(process_request)
}

/// Handle one request regardless of path or payload.
pub async fn process_request(request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    if request.method() != Method::GET {
        tracing::debug!(peer = ?peer, method = %request.method(), "Rejected non-GET request");
        return (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY).into_response();
    }

    tracing::info!(peer = ?peer, path = %request.uri().path(), "New request");
    PROCESSED_BODY.into_response()
}
