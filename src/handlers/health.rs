use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use crate::services::ServiceFactory;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

pub async fn health_check(State(services): State<ServiceFactory>) -> (StatusCode, Json<HealthResponse>) {
    let health = services.health_check().await;
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            ok: health.is_healthy(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            issues: health.get_issues(),
        }),
    )
}
