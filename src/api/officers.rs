//! Officer directory endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::officer::{Officer, OfficerQuery},
};

use super::AuthenticatedOfficer;

/// List officers available for crew assignment
#[utoipa::path(
    get,
    path = "/officers",
    tag = "officers",
    security(("bearer_auth" = [])),
    params(OfficerQuery),
    responses(
        (status = 200, description = "Officers ordered by name", body = Vec<Officer>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_officers(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(_claims): AuthenticatedOfficer,
    Query(query): Query<OfficerQuery>,
) -> AppResult<Json<Vec<Officer>>> {
    let officers = state.services.officers.list(&query).await?;
    Ok(Json(officers))
}
