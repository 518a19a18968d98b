//! Typed REST client for the CampusConnect API
//!
//! Mirrors the server routes one method per endpoint. Non-2xx responses come
//! back as `CampusError::Remote` carrying the server's status and message.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use url::Url;
use crate::client::sync::GroupSource;
use crate::models::group::{
    AppendMessageRequest, ApprovalAction, ApprovalOutcome, CreateGroupRequest, Group, GroupFilter,
    GroupId, Viewer,
};
use crate::models::media::{MediaPayload, UploadedMedia};
use crate::models::user::{LoginRequest, PublicProfile, SignupRequest};
use crate::services::media::MediaUploader;
use crate::utils::errors::{CampusError, ErrorResponse, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Media attached to an outgoing chat message
#[derive(Debug, Clone, Default)]
pub struct OutgoingAttachments {
    pub image: Option<MediaPayload>,
    pub file: Option<MediaPayload>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:4000`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("CampusConnect-Client/1.0")
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join("api/")?.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            debug!(status = status.as_u16(), message = %message, "API request failed");
            return Err(CampusError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.client.post(self.url(path)?).json(body)).await
    }

    pub async fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(status) = filter.status {
            query.push(("status", status.as_str()));
        }
        if let Some(school) = filter.school.as_deref() {
            query.push(("school", school));
        }
        if let Some(email) = filter.created_by_email.as_deref() {
            query.push(("createdByEmail", email));
        }

        self.send(self.client.get(self.url("groups")?).query(&query)).await
    }

    pub async fn visible_groups(&self, viewer: &Viewer) -> Result<Vec<Group>> {
        self.send(self.client.get(self.url("groups/visible")?).query(viewer)).await
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Group> {
        self.send(self.client.get(self.url(&format!("groups/{}", id))?)).await
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group> {
        self.post_json("groups", request).await
    }

    pub async fn approve_or_reject(&self, id: GroupId, action: ApprovalAction) -> Result<ApprovalOutcome> {
        let action_name = match action {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
        };
        let request = self
            .client
            .patch(self.url(&format!("groups/{}/approve", id))?)
            .json(&json!({ "action": action_name }));

        match action {
            ApprovalAction::Approve => Ok(ApprovalOutcome::Approved(self.send(request).await?)),
            ApprovalAction::Reject => {
                let _: serde_json::Value = self.send(request).await?;
                Ok(ApprovalOutcome::Rejected)
            }
        }
    }

    pub async fn join(&self, id: GroupId, email: &str) -> Result<Group> {
        self.post_json(&format!("groups/{}/join", id), &json!({ "email": email })).await
    }

    pub async fn leave(&self, id: GroupId, email: &str) -> Result<Group> {
        self.post_json(&format!("groups/{}/leave", id), &json!({ "email": email })).await
    }

    pub async fn append_message(&self, id: GroupId, request: &AppendMessageRequest) -> Result<Group> {
        self.post_json(&format!("groups/{}/messages", id), request).await
    }

    pub async fn delete_group(&self, id: GroupId, requester: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("groups/{}", id))?)
            .query(&[("requester", requester)]);
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<PublicProfile> {
        self.post_json("signup", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<PublicProfile> {
        self.post_json("login", request).await
    }

    /// Upload the attachments one after another, then append the message.
    ///
    /// Nothing is appended if any upload fails.
    pub async fn send_message_with_attachments(
        &self,
        id: GroupId,
        sender: &str,
        content: Option<String>,
        attachments: OutgoingAttachments,
    ) -> Result<Group> {
        let mut request = AppendMessageRequest {
            sender: Some(sender.to_string()),
            content,
            ..Default::default()
        };

        if let Some(image) = attachments.image {
            request.image_url = Some(self.upload(image).await?.url);
        }

        if let Some(file) = attachments.file {
            let file_name = file.file_name.clone();
            let file_type = file.mime_type.clone();
            request.file_url = Some(self.upload(file).await?.url);
            request.file_name = Some(file_name);
            request.file_type = Some(file_type);
        }

        self.append_message(id, &request).await
    }
}

#[async_trait]
impl MediaUploader for ApiClient {
    /// Uploads through the server's `/api/upload` endpoint
    async fn upload(&self, payload: MediaPayload) -> Result<UploadedMedia> {
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)?;
        let form = Form::new().part("file", part);

        self.send(self.client.post(self.url("upload")?).multipart(form)).await
    }
}

#[async_trait]
impl GroupSource for ApiClient {
    async fn fetch_group(&self, id: GroupId) -> Result<Group> {
        self.get_group(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_rooted_under_api() {
        let client = ApiClient::new("http://localhost:4000").unwrap();
        assert_eq!(client.url("groups").unwrap().as_str(), "http://localhost:4000/api/groups");

        let nested = ApiClient::new("http://example.com/campus").unwrap();
        assert_eq!(
            nested.url("groups/visible").unwrap().as_str(),
            "http://example.com/campus/api/groups/visible"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(CampusError::UrlParse(_))));
    }
}
