//! Media upload service
//!
//! Binary payloads go to a Cloudinary-compatible hosted media service, which
//! hands back a stable URL. One attempt per upload; failures surface as
//! `CampusError::Upstream`.

use std::collections::BTreeMap;
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use crate::config::MediaConfig;
use crate::models::media::{MediaPayload, UploadedMedia};
use crate::utils::errors::{CampusError, Result};
use crate::utils::logging::{log_api_error, log_upload};

/// Anything that can turn bytes into a hosted URL
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, payload: MediaPayload) -> Result<UploadedMedia>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// How an upload request authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
enum UploadAuth {
    Unsigned { preset: String },
    Signed { api_key: String, api_secret: String },
}

/// Cloudinary upload client
#[derive(Clone, Debug)]
pub struct CloudinaryUploader {
    client: Client,
    config: MediaConfig,
}

impl CloudinaryUploader {
    /// Create a new CloudinaryUploader instance
    pub fn new(config: MediaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("CampusConnect/1.0")
            .build()?;

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    fn auth(&self) -> Result<UploadAuth> {
        if self.config.cloud_name.is_empty() {
            return Err(CampusError::Upstream("Media service cloud name is not configured".to_string()));
        }

        if let Some(preset) = self.config.upload_preset.as_ref().filter(|p| !p.is_empty()) {
            return Ok(UploadAuth::Unsigned { preset: preset.clone() });
        }

        match (&self.config.api_key, &self.config.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => Ok(UploadAuth::Signed {
                api_key: key.clone(),
                api_secret: secret.clone(),
            }),
            _ => Err(CampusError::Upstream("Media service credentials are not configured".to_string())),
        }
    }

    fn build_form(&self, payload: MediaPayload, auth: UploadAuth) -> Result<Form> {
        let file = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)
            .map_err(|_| CampusError::Validation(format!("Invalid content type: {}", payload.mime_type)))?;

        let mut form = Form::new().part("file", file);
        if !self.config.folder.is_empty() {
            form = form.text("folder", self.config.folder.clone());
        }

        let form = match auth {
            UploadAuth::Unsigned { preset } => form.text("upload_preset", preset),
            UploadAuth::Signed { api_key, api_secret } => {
                let timestamp = Utc::now().timestamp().to_string();
                let mut params = BTreeMap::new();
                if !self.config.folder.is_empty() {
                    params.insert("folder", self.config.folder.as_str());
                }
                params.insert("timestamp", timestamp.as_str());
                let signature = sign_params(&params, &api_secret);

                form.text("api_key", api_key)
                    .text("timestamp", timestamp.clone())
                    .text("signature_algorithm", "sha256")
                    .text("signature", signature)
            }
        };

        Ok(form)
    }
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, payload: MediaPayload) -> Result<UploadedMedia> {
        let auth = self.auth()?;
        let file_name = payload.file_name.clone();
        let size = payload.bytes.len();
        let url = self.upload_url();

        debug!(file_name = %file_name, size_bytes = size, url = %url, "Uploading media");

        let form = self.build_form(payload, auth)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log_api_error("media", &e.to_string(), Some(&file_name));
                log_upload(&file_name, size, None);
                CampusError::Upstream(format!("Media service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log_api_error("media", &format!("HTTP {}", status), Some(&error_text));
            log_upload(&file_name, size, None);
            return Err(CampusError::Upstream(format!("HTTP {}: {}", status, error_text)));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| CampusError::Upstream(format!("Invalid media service response: {}", e)))?;

        log_upload(&file_name, size, Some(&body.secure_url));
        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

/// SHA-256 request signature: sorted `key=value` pairs joined with `&`,
/// followed directly by the API secret, hex encoded
pub fn sign_params(params: &BTreeMap<&str, &str>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
