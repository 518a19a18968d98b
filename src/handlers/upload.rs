//! Media upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;
use crate::models::media::{MediaPayload, UploadedMedia};
use crate::services::ServiceFactory;
use crate::utils::errors::{CampusError, Result};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const DEFAULT_FILE_NAME: &str = "upload";

/// Accepts a multipart form with a `file` field and forwards it to the media service
pub async fn upload_media(
    State(services): State<ServiceFactory>,
    mut multipart: Multipart,
) -> Result<Json<UploadedMedia>> {
    let mut payload: Option<MediaPayload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CampusError::Validation(format!("Failed to read field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let mime_type = field.content_type().unwrap_or(DEFAULT_MIME_TYPE).to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| CampusError::Validation(format!("Failed to read file: {}", e)))?
            .to_vec();

        payload = Some(MediaPayload {
            bytes,
            file_name,
            mime_type,
        });
    }

    let payload = payload.ok_or_else(|| CampusError::Validation("No file provided".to_string()))?;
    info!(file_name = %payload.file_name, size_bytes = payload.bytes.len(), "Upload request received");

    Ok(Json(services.media_service.upload(payload).await?))
}
