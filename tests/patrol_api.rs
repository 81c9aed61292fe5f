//! In-process API tests against the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use patrol_desk_server::{
    api,
    config::{AppConfig, CreationPolicy},
    models::{Officer, OfficerClaims, Role},
    repository::MemoryStore,
    services::Services,
    AppState,
};

const ADMIN_ID: i32 = 1;
const OFFICER_1_ID: i32 = 11;
const OFFICER_2_ID: i32 = 12;

fn app(policy: CreationPolicy) -> (AppConfig, Router) {
    let mut config = AppConfig::default();
    config.patrols.creation_policy = policy;

    let store = MemoryStore::with_officers(vec![
        Officer { id: ADMIN_ID, full_name: "Anna Sokolova".into(), badge_number: "A-001".into(), role: Role::Admin },
        Officer { id: OFFICER_1_ID, full_name: "Ivan Petrov".into(), badge_number: "B-011".into(), role: Role::User },
        Officer { id: OFFICER_2_ID, full_name: "Olga Smirnova".into(), badge_number: "B-012".into(), role: Role::User },
    ]);
    let services = Services::new(Arc::new(store.clone()), Arc::new(store), config.patrols.clone());
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (config, api::routes(state))
}

fn token(config: &AppConfig, officer_id: i32, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    OfficerClaims {
        sub: officer_id.to_string(),
        officer_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("Failed to create token")
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, body)
}

async fn create_unit(app: &Router, token: &str, body: Value) -> i64 {
    let (status, body) = call(app, Method::POST, "/patrols", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().expect("No unit ID")
}

#[tokio::test]
async fn test_health_check() {
    let (_config, app) = app(CreationPolicy::Strict);
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unauthorized_access() {
    let (_config, app) = app(CreationPolicy::Strict);
    let (status, body) = call(&app, Method::GET, "/patrols", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthenticated");

    let (status, _) = call(&app, Method::GET, "/patrols", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_sets_unit_busy_with_reason() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Alpha-1", "vehicle_number": "P001" })).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status", id),
        Some(&admin),
        Some(json!({ "status": "busy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "reason_required");
    assert_eq!(body["unit_id"], id);
    assert_eq!(body["status"], "busy");

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status/confirm", id),
        Some(&admin),
        Some(json!({ "status": "busy", "reason": "Traffic stop" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "busy");
    assert_eq!(body["status_reason"], "Traffic stop");
}

#[tokio::test]
async fn test_unassigned_officer_cannot_change_status() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let outsider = token(&config, OFFICER_2_ID, Role::User);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Alpha-1", "officer_1": OFFICER_1_ID })).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status", id),
        Some(&outsider),
        Some(json!({ "status": "unavailable" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["retryable"], false);

    let (_, unit) = call(&app, Method::GET, &format!("/patrols/{}", id), Some(&admin), None).await;
    assert_eq!(unit["status"], "available");
}

#[tokio::test]
async fn test_empty_reason_is_rejected() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Alpha-1" })).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status/confirm", id),
        Some(&admin),
        Some(json!({ "status": "unavailable", "reason": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ReasonRequired");
    assert_eq!(body["message"], "reason required");

    let (_, unit) = call(&app, Method::GET, &format!("/patrols/{}", id), Some(&admin), None).await;
    assert_eq!(unit["status"], "available");
}

#[tokio::test]
async fn test_assigned_officer_sets_available_immediately() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let officer = token(&config, OFFICER_1_ID, Role::User);
    let id = create_unit(
        &app,
        &admin,
        json!({
            "unit_name": "Bravo-2",
            "status": "on_scene",
            "status_reason": "Robbery call",
            "officer_1": OFFICER_1_ID
        }),
    )
    .await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status", id),
        Some(&officer),
        Some(json!({ "status": "available" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "applied");
    assert_eq!(body["unit"]["status"], "available");
    assert_eq!(body["unit"]["status_reason"], Value::Null);
}

#[tokio::test]
async fn test_soft_delete_hides_unit_from_listing() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Charlie-3" })).await;

    let (status, _) = call(&app, Method::DELETE, &format!("/patrols/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listing) = call(&app, Method::GET, "/patrols", Some(&admin), None).await;
    assert_eq!(listing, json!([]));

    let (status, unit) = call(&app, Method::GET, &format!("/patrols/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit["is_active"], false);
}

#[tokio::test]
async fn test_listing_includes_crew_names() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    create_unit(
        &app,
        &admin,
        json!({ "unit_name": "Delta-4", "officer_1": OFFICER_1_ID, "officer_2": OFFICER_2_ID }),
    )
    .await;

    let (status, listing) = call(&app, Method::GET, "/patrols", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing[0]["unit_name"], "Delta-4");
    assert_eq!(listing[0]["officer_1_name"], "Ivan Petrov");
    assert_eq!(listing[0]["officer_2_badge"], "B-012");
}

#[tokio::test]
async fn test_creation_policies() {
    let (config, strict) = app(CreationPolicy::Strict);
    let officer = token(&config, OFFICER_2_ID, Role::User);
    let (status, _) = call(&strict, Method::POST, "/patrols", Some(&officer), Some(json!({ "unit_name": "Echo-5" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (config, permissive) = app(CreationPolicy::Permissive);
    let officer = token(&config, OFFICER_2_ID, Role::User);
    let (status, unit) = call(
        &permissive,
        Method::POST,
        "/patrols",
        Some(&officer),
        Some(json!({ "unit_name": "Echo-5", "officer_1": OFFICER_1_ID })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(unit["officer_1"], OFFICER_2_ID);
    assert_eq!(unit["status"], "available");
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Foxtrot-6" })).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/patrols/{}/status", id),
        Some(&admin),
        Some(json!({ "status": "emergency" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["retryable"], false);

    let (_, unit) = call(&app, Method::GET, &format!("/patrols/{}", id), Some(&admin), None).await;
    assert_eq!(unit["status"], "available");
}

#[tokio::test]
async fn test_malformed_body_gets_error_shape() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);

    let (status, body) = call(&app, Method::POST, "/patrols", Some(&admin), Some(json!({ "unit_name": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_update_rejects_out_of_range_coordinates() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);
    let id = create_unit(&app, &admin, json!({ "unit_name": "Hotel-8", "latitude": 55.75, "longitude": 37.61 })).await;

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/patrols/{}", id),
        Some(&admin),
        Some(json!({ "latitude": 500.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/patrols/{}", id),
        Some(&admin),
        Some(json!({ "longitude": -181.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unit) = call(
        &app,
        Method::PUT,
        &format!("/patrols/{}", id),
        Some(&admin),
        Some(json!({ "latitude": null, "longitude": 30.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit["latitude"], Value::Null);
    assert_eq!(unit["longitude"], 30.0);
}

#[tokio::test]
async fn test_officer_directory_and_stats() {
    let (config, app) = app(CreationPolicy::Strict);
    let admin = token(&config, ADMIN_ID, Role::Admin);

    let (status, officers) = call(&app, Method::GET, "/officers", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = officers
        .as_array()
        .expect("officers is an array")
        .iter()
        .filter_map(|o| o["full_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Ivan Petrov", "Olga Smirnova"]);

    let (_, admins) = call(&app, Method::GET, "/officers?role=admin", Some(&admin), None).await;
    assert_eq!(admins[0]["badge_number"], "A-001");

    create_unit(&app, &admin, json!({ "unit_name": "Golf-7" })).await;
    let (status, stats) = call(&app, Method::GET, "/stats/patrols", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["active_units"], 1);
    assert_eq!(stats["by_status"][0], json!({ "status": "available", "count": 1 }));
}
