//! Mock hosted media service
//!
//! A wiremock server answering the Cloudinary-style upload route.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use CampusConnect::config::Settings;

pub const TEST_CLOUD: &str = "test-cloud";

pub struct MediaMockServer {
    pub server: MockServer,
}

impl MediaMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn upload_path() -> String {
        format!("/v1_1/{}/auto/upload", TEST_CLOUD)
    }

    /// Point `settings` at this server
    pub fn configure(&self, settings: &mut Settings) {
        settings.media.api_base_url = self.uri();
        settings.media.cloud_name = TEST_CLOUD.to_string();
    }

    /// Every upload succeeds with the given URL
    pub async fn mount_success(&self, secure_url: &str, public_id: &str) {
        Mock::given(method("POST"))
            .and(path(Self::upload_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": secure_url,
                "public_id": public_id,
                "resource_type": "image",
            })))
            .mount(&self.server)
            .await;
    }

    /// Every upload is rejected with `status`
    pub async fn mount_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(Self::upload_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": "Upload preset not found" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Raw bodies of the upload requests received so far
    pub async fn upload_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
