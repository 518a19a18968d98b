//! Test context for unified test setup
//!
//! Wraps the full router on the in-memory store so tests can drive the HTTP
//! surface without a network listener.

use std::sync::Once;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use CampusConnect::{
    build_router,
    config::{Settings, StorageBackend},
    DatabaseService, ServiceFactory,
};
use super::test_data::group_body;

static INIT: Once = Once::new();

/// Initialize test logging once per binary
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Settings for an in-memory app with cheap password hashing
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.backend = StorageBackend::Memory;
    settings.auth.bcrypt_cost = 4;
    settings.media.cloud_name = "test-cloud".to_string();
    settings.media.upload_preset = Some("unsigned-test".to_string());
    settings.media.timeout_seconds = 5;
    settings
}

/// Decoded response of a single request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn error_kind(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// The application under test
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub services: ServiceFactory,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        init_test_env();
        let services = ServiceFactory::new(settings, DatabaseService::in_memory())
            .expect("Failed to create service factory");
        let router = build_router(services.clone());

        Self { router, services }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("Failed to encode body"))),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a group and return its id
    pub async fn create_group(&self, email: &str, designation: &str, school: &str) -> String {
        let response = self.post("/api/groups", group_body(email, designation, school)).await;
        assert_eq!(response.status, StatusCode::CREATED, "create failed: {}", response.body);
        response.body["id"].as_str().expect("Group id missing").to_string()
    }

    /// Serve the router on an ephemeral local port and return its base URL
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });

        format!("http://{}", addr)
    }
}
