//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, officers, patrols, stats};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patrol Desk API",
        version = "1.0.0",
        description = "Police records server: patrol units and their status workflow"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Patrols
        patrols::list_patrols,
        patrols::get_patrol,
        patrols::create_patrol,
        patrols::update_patrol,
        patrols::delete_patrol,
        patrols::request_status_change,
        patrols::confirm_status_change,
        // Officers
        officers::list_officers,
        // Stats
        stats::get_patrol_stats,
    ),
    components(
        schemas(
            // Patrols
            crate::models::patrol::PatrolStatus,
            crate::models::patrol::PatrolUnit,
            crate::models::patrol::PatrolUnitView,
            crate::models::patrol::CreatePatrolUnit,
            crate::models::patrol::UpdatePatrolUnit,
            patrols::StatusChangeRequest,
            patrols::ConfirmStatusRequest,
            patrols::StatusChangeResponse,
            // Officers
            crate::models::officer::Role,
            crate::models::officer::Officer,
            // Stats
            crate::models::patrol::PatrolStats,
            crate::models::patrol::StatusCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "patrols", description = "Patrol units and status workflow"),
        (name = "officers", description = "Officer directory"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
