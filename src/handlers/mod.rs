//! HTTP handlers module
//!
//! This module contains the REST endpoints, grouped by resource, and the
//! router that mounts them under `/api`.

pub mod auth;
pub mod groups;
pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use crate::middleware::{enforce_rate_limit, log_requests, RateLimitMiddleware};
use crate::services::ServiceFactory;

/// Build the application router around a fully initialized service factory
pub fn build_router(services: ServiceFactory) -> Router {
    let server = services.settings.server.clone();

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route("/groups/visible", get(groups::visible_groups))
        .route("/groups/{id}", get(groups::get_group).delete(groups::delete_group))
        .route("/groups/{id}/approve", patch(groups::approve_group))
        .route("/groups/{id}/join", post(groups::join_group))
        .route("/groups/{id}/leave", post(groups::leave_group))
        .route("/groups/{id}/messages", post(groups::append_message))
        .route("/upload", post(upload::upload_media))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/user/profile", get(auth::get_profile).patch(auth::update_profile))
        .route("/user/change-password", post(auth::change_password));

    let mut router = Router::new().nest("/api", api).with_state(services);

    if let Some(limiter) = server.rate_limit_per_minute.and_then(RateLimitMiddleware::per_minute) {
        tracing::info!(per_minute = ?server.rate_limit_per_minute, "Rate limiting enabled");
        router = router.layer(middleware::from_fn_with_state(limiter, enforce_rate_limit));
    }

    router
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
}
