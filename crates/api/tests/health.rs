//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, TestEnv};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let env = TestEnv::new();
    let response = get(env.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let env = TestEnv::new();
    let response = get(env.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let env = TestEnv::new();
    let response = get(env.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: static assets are served from the assets directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn serves_static_assets() {
    let env = TestEnv::new();
    common::write(&env.config.assets_dir.join("styles.css"), "body{}");

    let response = get(env.app(), "/public/styles.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_string(response).await, "body{}");

    let response = get(env.app(), "/public/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
