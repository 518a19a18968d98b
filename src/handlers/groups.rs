//! Study group endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;
use crate::models::group::{
    AppendMessageRequest, ApprovalAction, ApprovalOutcome, ApprovalRequest, CreateGroupRequest,
    DeleteGroupQuery, Group, GroupFilter, GroupId, GroupListQuery, MembershipRequest, Viewer,
};
use crate::services::ServiceFactory;
use crate::utils::errors::{CampusError, Result};
use crate::utils::helpers::require_field;

/// Ids that are not UUIDs cannot name a group
pub fn parse_group_id(raw: &str) -> Result<GroupId> {
    Uuid::parse_str(raw).map_err(|_| CampusError::group_not_found(raw))
}

/// Unwrap a JSON body, reporting malformed input as a validation error
pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| CampusError::Validation(rejection.body_text()))
}

pub async fn list_groups(
    State(services): State<ServiceFactory>,
    Query(query): Query<GroupListQuery>,
) -> Result<Json<Vec<Group>>> {
    let filter = GroupFilter::try_from(query)?;
    Ok(Json(services.group_service.list_groups(&filter).await?))
}

pub async fn visible_groups(
    State(services): State<ServiceFactory>,
    Query(viewer): Query<Viewer>,
) -> Result<Json<Vec<Group>>> {
    Ok(Json(services.group_service.visible_groups(&viewer).await?))
}

pub async fn get_group(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
) -> Result<Json<Group>> {
    let id = parse_group_id(&id)?;
    Ok(Json(services.group_service.get_group(id).await?))
}

pub async fn create_group(
    State(services): State<ServiceFactory>,
    payload: std::result::Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Group>)> {
    let request = json_body(payload)?;
    let group = services.group_service.create_group(request).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// `approve` returns the updated group, `reject` deletes it and acknowledges
pub async fn approve_group(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ApprovalRequest>, JsonRejection>,
) -> Result<Response> {
    let id = parse_group_id(&id)?;
    let action: ApprovalAction = require_field(json_body(payload)?.action, "action")?.parse()?;

    let response = match services.group_service.approve_or_reject(id, action).await? {
        ApprovalOutcome::Approved(group) => Json(group).into_response(),
        ApprovalOutcome::Rejected => Json(json!({ "ok": true, "action": "rejected" })).into_response(),
    };

    Ok(response)
}

pub async fn join_group(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<MembershipRequest>, JsonRejection>,
) -> Result<Json<Group>> {
    let id = parse_group_id(&id)?;
    let request = json_body(payload)?;
    Ok(Json(services.group_service.join(id, request.email).await?))
}

pub async fn leave_group(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<MembershipRequest>, JsonRejection>,
) -> Result<Json<Group>> {
    let id = parse_group_id(&id)?;
    let request = json_body(payload)?;
    Ok(Json(services.group_service.leave(id, request.email).await?))
}

pub async fn append_message(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Result<Json<Group>> {
    let id = parse_group_id(&id)?;
    let request = json_body(payload)?;
    Ok(Json(services.group_service.append_message(id, request).await?))
}

pub async fn delete_group(
    State(services): State<ServiceFactory>,
    Path(id): Path<String>,
    Query(query): Query<DeleteGroupQuery>,
) -> Result<Json<serde_json::Value>> {
    let id = parse_group_id(&id)?;
    services
        .group_service
        .delete_group(id, query.requester.as_deref())
        .await?;

    Ok(Json(json!({ "ok": true })))
}
