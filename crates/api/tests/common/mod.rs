#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use bridge_api::config::ServerConfig;
use bridge_api::router::build_app_router;
use bridge_api::state::AppState;

/// Scratch sessions tree plus the config pointing at it.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: ServerConfig,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("sessions");
        fs::create_dir_all(&root).unwrap();
        let config = test_config(dir.path(), &root);
        Self { dir, config }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.config.auth_token = token.to_string();
        self
    }

    pub fn sessions_root(&self) -> PathBuf {
        self.config.sessions_dir.clone()
    }

    pub fn app(&self) -> Router {
        build_test_app(self.config.clone())
    }

    /// Create `<root>/<account>/<workspace>/<local>` with a `.claude` entry.
    pub fn add_session(&self, account: &str, workspace: &str, local: &str) -> PathBuf {
        let session = self.sessions_root().join(account).join(workspace).join(local);
        fs::create_dir_all(session.join(".claude")).unwrap();
        session
    }
}

/// Build a test `ServerConfig` rooted in `base`.
pub fn test_config(base: &Path, sessions_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        sessions_dir: sessions_dir.to_path_buf(),
        bridge_dir: None,
        auth_token: String::new(),
        scripts_dir: base.join("scripts"),
        prompts_dir: base.join("prompts"),
        assets_dir: base.join("public"),
        watcher_log: base.join("watcher.log"),
        launchd_plist: base.join("missing.plist"),
        home_dir: base.join("home"),
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same builder as `main.rs` so integration tests exercise the
/// production middleware stack (auth, request ID, timeout, tracing, panic
/// recovery).
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app_router(AppState::new(config))
}

/// Bridge directory of a session.
pub fn bridge_dir(session: &Path) -> PathBuf {
    session.join("outputs").join(".bridge")
}

pub fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

pub fn enc(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

pub fn session_query(session: &Path) -> String {
    format!("path={}", enc(&session.display().to_string()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: Router, uri: &str, form: &[(&str, &str)]) -> Response<Body> {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();
    let request = Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
