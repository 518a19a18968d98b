//! Logging middleware
//!
//! Records method, path, status and latency for every handled request.

use std::time::Instant;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{debug_span, Instrument};
use crate::utils::logging::log_request;

/// Request logging middleware, used with `axum::middleware::from_fn`
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let span = debug_span!("request", method = %method, path = %path);
    let response = next.run(request).instrument(span).await;

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    log_request(method.as_str(), &path, response.status().as_u16(), duration_ms);

    response
}
