//! API handlers for the Patrol Desk REST endpoints

pub mod health;
pub mod officers;
pub mod openapi;
pub mod patrols;
pub mod stats;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use crate::{error::AppError, models::officer::OfficerClaims, AppState};

/// JSON body extractor whose rejection is an `AppError`, so malformed bodies get the JSON error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Extractor for the calling officer, taken from the bearer token
pub struct AuthenticatedOfficer(pub OfficerClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedOfficer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = OfficerClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedOfficer(claims))
    }
}

/// API v1 routes, without the `/api/v1` prefix
pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Patrol units
        .route("/patrols", get(patrols::list_patrols).post(patrols::create_patrol))
        .route(
            "/patrols/:id",
            get(patrols::get_patrol)
                .put(patrols::update_patrol)
                .delete(patrols::delete_patrol),
        )
        .route("/patrols/:id/status", post(patrols::request_status_change))
        .route("/patrols/:id/status/confirm", post(patrols::confirm_status_change))
        // Officer directory
        .route("/officers", get(officers::list_officers))
        // Statistics
        .route("/stats/patrols", get(stats::get_patrol_stats))
        .with_state(state)
}
