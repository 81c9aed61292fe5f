//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::patrol::PatrolStats};

use super::AuthenticatedOfficer;

/// Active patrol units per status
#[utoipa::path(
    get,
    path = "/stats/patrols",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Patrol statistics", body = PatrolStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_patrol_stats(
    State(state): State<crate::AppState>,
    AuthenticatedOfficer(_claims): AuthenticatedOfficer,
) -> AppResult<Json<PatrolStats>> {
    let stats = state.services.stats.patrol_stats().await?;
    Ok(Json(stats))
}
