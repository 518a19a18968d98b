//! Account endpoints: signup, login and profile management

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use crate::handlers::groups::json_body;
use crate::models::user::{ChangePasswordRequest, LoginRequest, ProfileQuery, PublicProfile, SignupRequest, UpdateProfileRequest};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

pub async fn signup(
    State(services): State<ServiceFactory>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicProfile>)> {
    let profile = services.profile_service.signup(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(services): State<ServiceFactory>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<PublicProfile>> {
    Ok(Json(services.profile_service.login(json_body(payload)?).await?))
}

pub async fn get_profile(
    State(services): State<ServiceFactory>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<PublicProfile>> {
    Ok(Json(services.profile_service.get_profile(query.email).await?))
}

pub async fn update_profile(
    State(services): State<ServiceFactory>,
    payload: std::result::Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<PublicProfile>> {
    Ok(Json(services.profile_service.update_profile(json_body(payload)?).await?))
}

pub async fn change_password(
    State(services): State<ServiceFactory>,
    payload: std::result::Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    services.profile_service.change_password(json_body(payload)?).await?;
    Ok(Json(json!({ "ok": true })))
}
