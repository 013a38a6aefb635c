//! Integration tests for the shared token check.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_string, get, post_form, send, TestEnv};

const TOKEN: &str = "s3cret";

fn request(uri: &str, header: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn no_token_configured_allows_everything() {
    let env = TestEnv::new();
    let response = get(env.app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_forbidden() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = get(env.app(), "/").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "Forbidden");
}

#[tokio::test]
async fn wrong_token_is_forbidden() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = send(env.app(), request("/", Some(("x-bridge-token", "nope")))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn header_token_is_accepted() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = send(env.app(), request("/", Some(("x-bridge-token", TOKEN)))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = send(
        env.app(),
        request("/global", Some(("cookie", "theme=dark; bridge_token=s3cret"))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn query_token_sets_cookie() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = get(env.app(), "/?token=s3cret").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("cookie should be set")
        .to_str()
        .unwrap();
    assert_eq!(cookie, "bridge_token=s3cret; Path=/; SameSite=Lax; HttpOnly");
}

#[tokio::test]
async fn health_is_public() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = get(env.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_assets_need_the_token() {
    let env = TestEnv::new().with_token(TOKEN);
    common::write(&env.config.assets_dir.join("ui.js"), "");
    let response = get(env.app(), "/public/ui.js").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn form_token_sets_cookie_and_reaches_handler() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = post_form(
        env.app(),
        "/actions/global",
        &[("action", "explode"), ("token", TOKEN)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("cookie should be set")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(cookie, "bridge_token=s3cret; Path=/; SameSite=Lax; HttpOnly");
    // The handler still sees the rest of the form.
    assert!(body_string(response).await.contains("Unknown action: explode"));
}

#[tokio::test]
async fn wrong_form_token_is_forbidden() {
    let env = TestEnv::new().with_token(TOKEN);
    let response = post_form(
        env.app(),
        "/actions/global",
        &[("action", "explode"), ("token", "nope")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
