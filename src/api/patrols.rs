//! Patrol unit endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::patrol::{CreatePatrolUnit, PatrolStatus, PatrolUnit, PatrolUnitView, UpdatePatrolUnit},
    workflow::StatusChange,
};

use super::{AppJson, AuthenticatedOfficer};

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    pub status: PatrolStatus,
}

/// Status change confirmation, carrying the reason
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmStatusRequest {
    pub status: PatrolStatus,
    #[serde(default)]
    pub reason: String,
}

/// Result of a status change request
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusChangeResponse {
    /// The change was written
    Applied { unit: PatrolUnit },
    /// The change needs a reason; confirm it with the same status
    ReasonRequired { unit_id: i32, status: PatrolStatus },
}

impl From<StatusChange> for StatusChangeResponse {
    fn from(change: StatusChange) -> Self {
        match change {
            StatusChange::Applied(unit) => StatusChangeResponse::Applied { unit },
            StatusChange::ReasonRequired(pending) => StatusChangeResponse::ReasonRequired {
                unit_id: pending.unit_id,
                status: pending.status,
            },
        }
    }
}

/// List active patrol units with their crew
#[utoipa::path(
    get,
    path = "/patrols",
    tag = "patrols",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active patrol units, newest first", body = Vec<PatrolUnitView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_patrols(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(_claims): AuthenticatedOfficer,
) -> AppResult<Json<Vec<PatrolUnitView>>> {
    let units = state.services.patrols.list_units().await?;
    Ok(Json(units))
}

/// Get a patrol unit by ID (also returns soft-deleted units)
#[utoipa::path(
    get,
    path = "/patrols/{id}",
    tag = "patrols",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patrol unit ID")),
    responses(
        (status = 200, description = "Patrol unit", body = PatrolUnit),
        (status = 404, description = "Patrol unit not found")
    )
)]
pub async fn get_patrol(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(_claims): AuthenticatedOfficer,
    Path(id): Path<i32>,
) -> AppResult<Json<PatrolUnit>> {
    let unit = state.services.patrols.get_unit(id).await?;
    Ok(Json(unit))
}

/// Create a patrol unit
#[utoipa::path(
    post,
    path = "/patrols",
    tag = "patrols",
    security(("bearer_auth" = [])),
    request_body = CreatePatrolUnit,
    responses(
        (status = 201, description = "Patrol unit created", body = PatrolUnit),
        (status = 400, description = "Missing unit name or reason"),
        (status = 403, description = "Caller may not create units")
    )
)]
pub async fn create_patrol(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(claims): AuthenticatedOfficer,
    AppJson(data): AppJson<CreatePatrolUnit>,
) -> AppResult<(StatusCode, Json<PatrolUnit>)> {
    data.validate()?;
    let unit = state.services.patrols.create_unit(data, &claims.actor()).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Edit a patrol unit's fields
#[utoipa::path(
    put,
    path = "/patrols/{id}",
    tag = "patrols",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patrol unit ID")),
    request_body = UpdatePatrolUnit,
    responses(
        (status = 200, description = "Patrol unit updated", body = PatrolUnit),
        (status = 403, description = "Caller may not manage this unit"),
        (status = 404, description = "Patrol unit not found")
    )
)]
pub async fn update_patrol(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(claims): AuthenticatedOfficer,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdatePatrolUnit>,
) -> AppResult<Json<PatrolUnit>> {
    data.validate()?;
    let unit = state.services.patrols.update_unit(id, data, &claims.actor()).await?;
    Ok(Json(unit))
}

/// Soft-delete a patrol unit
#[utoipa::path(
    delete,
    path = "/patrols/{id}",
    tag = "patrols",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patrol unit ID")),
    responses(
        (status = 204, description = "Patrol unit deactivated"),
        (status = 403, description = "Caller may not manage this unit"),
        (status = 404, description = "Patrol unit not found")
    )
)]
pub async fn delete_patrol(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(claims): AuthenticatedOfficer,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.patrols.soft_delete_unit(id, &claims.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request a status change
#[utoipa::path(
    post,
    path = "/patrols/{id}/status",
    tag = "patrols",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patrol unit ID")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Applied, or a reason is required", body = StatusChangeResponse),
        (status = 403, description = "Caller may not manage this unit"),
        (status = 404, description = "Patrol unit not found")
    )
)]
pub async fn request_status_change(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(claims): AuthenticatedOfficer,
    Path(id): Path<i32>,
    AppJson(data): AppJson<StatusChangeRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    let change = state
        .services
        .patrols
        .request_status_change(id, data.status, &claims.actor())
        .await?;
    Ok(Json(change.into()))
}

/// Confirm a status change with its reason
#[utoipa::path(
    post,
    path = "/patrols/{id}/status/confirm",
    tag = "patrols",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patrol unit ID")),
    request_body = ConfirmStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = PatrolUnit),
        (status = 400, description = "Reason required"),
        (status = 403, description = "Caller may not manage this unit"),
        (status = 503, description = "Store unavailable, retry")
    )
)]
pub async fn confirm_status_change(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(claims): AuthenticatedOfficer,
    Path(id): Path<i32>,
    AppJson(data): AppJson<ConfirmStatusRequest>,
) -> AppResult<Json<PatrolUnit>> {
    let unit = state
        .services
        .patrols
        .confirm_status_change(id, data.status, &data.reason, &claims.actor())
        .await?;
    Ok(Json(unit))
}
