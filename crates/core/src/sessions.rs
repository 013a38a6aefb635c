//! Session discovery and per-session read models.
//!
//! Sessions live at `<root>/<account>/<workspace>/local_*` and are created
//! by the external agent only; this module never writes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;

use crate::bridge::{BridgeDir, SessionResolver};
use crate::scan;

/// Session directories start with this prefix.
const SESSION_DIR_PREFIX: &str = "local_";

/// Per-session config file name.
pub const SESSION_CONFIG_FILE: &str = "cowork_settings.json";

/// Id reported for the single session in direct-bridge mode.
pub const DIRECT_SESSION_ID: &str = "direct-bridge";

/// A discovered session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub path: PathBuf,
    pub account_id: String,
    pub workspace_id: String,
    /// Sibling `<id>.json` metadata file.
    pub meta_path: Option<PathBuf>,
    pub meta_exists: bool,
    pub title: String,
    pub bridge_status: String,
    pub modified: Option<SystemTime>,
}

/// Account and workspace ids derived from a session path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIds {
    pub account_id: String,
    pub workspace_id: String,
}

/// `<root>/<account>/<workspace>/<session>` yields `(account, workspace)`.
pub fn session_ids(session: &Path) -> SessionIds {
    let workspace = session.parent();
    let account = workspace.and_then(Path::parent);
    SessionIds {
        account_id: file_name(account),
        workspace_id: file_name(workspace),
    }
}

/// Discover sessions, newest first.
pub async fn list_sessions(resolver: &SessionResolver) -> Vec<Session> {
    if let Some(direct) = resolver.bridge_override() {
        let status = bridge_status(&BridgeDir::new(direct))
            .await
            .unwrap_or_else(|| "unknown".into());
        return vec![Session {
            id: DIRECT_SESSION_ID.into(),
            path: direct.to_path_buf(),
            account_id: "direct".into(),
            workspace_id: "direct".into(),
            meta_path: None,
            meta_exists: false,
            title: String::new(),
            bridge_status: status,
            modified: scan::modified(direct).await,
        }];
    }

    let root = resolver.sessions_root();
    let mut sessions = Vec::new();

    for account_id in scan::list_dir(root).await {
        let account_path = root.join(&account_id);
        for workspace_id in scan::list_dir(&account_path).await {
            let workspace_path = account_path.join(&workspace_id);
            for local in scan::list_dir(&workspace_path).await {
                if !local.starts_with(SESSION_DIR_PREFIX) {
                    continue;
                }
                let session_path = workspace_path.join(&local);
                if !scan::exists(&session_path.join(".claude")).await {
                    continue;
                }

                let meta_path = workspace_path.join(format!("{local}.json"));
                let meta = scan::read_json(&meta_path).await;
                let status = bridge_status(&BridgeDir::for_session(&session_path))
                    .await
                    .unwrap_or_else(|| "missing".into());

                sessions.push(Session {
                    id: local.clone(),
                    account_id: account_id.clone(),
                    workspace_id: workspace_id.clone(),
                    meta_exists: scan::exists(&meta_path).await,
                    meta_path: Some(meta_path),
                    title: meta.as_ref().map(meta_title).unwrap_or_default(),
                    bridge_status: status,
                    modified: scan::modified(&session_path).await,
                    path: session_path,
                });
            }
        }
    }

    sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
    sessions
}

/// `status` from `status.json`, if present.
pub async fn bridge_status(bridge: &BridgeDir) -> Option<String> {
    scan::read_json(&bridge.status_file())
        .await
        .and_then(|json| json.get("status").and_then(Value::as_str).map(str::to_string))
        .filter(|status| !status.is_empty())
}

/// Title from session metadata: `title`, `sessionTitle`, then `name`.
pub fn meta_title(meta: &Value) -> String {
    ["title", "sessionTitle", "name"]
        .iter()
        .find_map(|key| meta.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Artifact counts and activity for one bridge directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub bridge_dir: PathBuf,
    pub status: String,
    pub requests: usize,
    pub responses: usize,
    pub streams: usize,
    pub last_activity: Option<SystemTime>,
}

pub async fn session_summary(bridge: &BridgeDir) -> SessionSummary {
    let requests_dir = bridge.requests_dir();
    let responses_dir = bridge.responses_dir();
    let streams_dir = bridge.streams_dir();
    let activity_dirs = [responses_dir.as_path(), requests_dir.as_path()];

    let (status, requests, responses, streams, last_activity) = tokio::join!(
        bridge_status(bridge),
        scan::list_stems(&requests_dir, "json"),
        scan::list_stems(&responses_dir, "json"),
        scan::list_stems(&streams_dir, "log"),
        scan::newest_mtime(&activity_dirs),
    );

    SessionSummary {
        bridge_dir: bridge.root().to_path_buf(),
        status: status.unwrap_or_else(|| "unknown".into()),
        requests: requests.len(),
        responses: responses.len(),
        streams: streams.len(),
        last_activity,
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Contents of the `<session-id>.json` sibling of a session directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMeta {
    pub session_id: String,
    pub title: String,
    /// `None` when the session has no metadata location.
    pub path: Option<PathBuf>,
    pub raw: Option<String>,
    /// Pretty JSON with `systemPrompt` replaced by a placeholder.
    pub pretty: Option<String>,
    pub system_prompt: Option<String>,
}

/// Read the metadata of a resolved session. Sessions without a metadata
/// file location (see [`SessionResolver::meta_file`]) read as missing.
pub async fn session_meta(resolver: &SessionResolver, session: &Path) -> SessionMeta {
    let session_id = file_name(Some(session));
    let path = resolver.meta_file(session);

    let raw = match &path {
        Some(path) => scan::read_text(path).await,
        None => None,
    };
    let parsed: Option<Value> = raw.as_deref().and_then(|text| serde_json::from_str(text).ok());

    let mut system_prompt = None;
    let pretty = parsed.as_ref().map(|meta| {
        let mut display = meta.clone();
        if let Some(obj) = display.as_object_mut() {
            if let Some(prompt) = obj
                .get("systemPrompt")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            {
                system_prompt = Some(prompt.to_string());
                obj.insert(
                    "systemPrompt".into(),
                    Value::from("(see System Prompt below)"),
                );
            }
        }
        serde_json::to_string_pretty(&display).unwrap_or_default()
    });

    SessionMeta {
        title: parsed.as_ref().map(meta_title).unwrap_or_default(),
        session_id,
        path,
        raw,
        pretty,
        system_prompt,
    }
}

// ---------------------------------------------------------------------------
// Config lookup
// ---------------------------------------------------------------------------

/// Where a session's `cowork_settings.json` was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Session,
    Workspace,
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub scope: ConfigScope,
    /// The config file (the session-level candidate when missing).
    pub path: PathBuf,
    /// Directory holding the config file.
    pub dir: PathBuf,
}

impl SessionConfig {
    pub fn exists(&self) -> bool {
        self.scope != ConfigScope::Missing
    }
}

/// Look for the config in the session dir, then its workspace dir.
pub async fn session_config(session: &Path) -> SessionConfig {
    let session_file = session.join(SESSION_CONFIG_FILE);
    if scan::exists(&session_file).await {
        return SessionConfig {
            scope: ConfigScope::Session,
            path: session_file,
            dir: session.to_path_buf(),
        };
    }

    if let Some(workspace) = session.parent() {
        let workspace_file = workspace.join(SESSION_CONFIG_FILE);
        if scan::exists(&workspace_file).await {
            return SessionConfig {
                scope: ConfigScope::Workspace,
                path: workspace_file,
                dir: workspace.to_path_buf(),
            };
        }
    }

    SessionConfig {
        scope: ConfigScope::Missing,
        path: session_file,
        dir: session.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Skill plugin location
// ---------------------------------------------------------------------------

/// Plugin base directory for the session's account/workspace pair.
///
/// Candidates, first existing wins (else the first):
/// `<root>/skills-plugin/<workspace>/<account>`,
/// `<root>/skills-plugin/<account>/<workspace>`,
/// `<root-parent>/skills-plugin/<account>/<workspace>/.claude-plugin`.
pub async fn plugin_base(sessions_root: &Path, session: &Path) -> PathBuf {
    let ids = session_ids(session);
    let primary = sessions_root
        .join("skills-plugin")
        .join(&ids.workspace_id)
        .join(&ids.account_id);
    let secondary = sessions_root
        .join("skills-plugin")
        .join(&ids.account_id)
        .join(&ids.workspace_id);
    let legacy = sessions_root
        .parent()
        .unwrap_or(sessions_root)
        .join("skills-plugin")
        .join(&ids.account_id)
        .join(&ids.workspace_id)
        .join(".claude-plugin");

    for candidate in [&primary, &secondary, &legacy] {
        if scan::exists(candidate).await {
            return candidate.clone();
        }
    }
    primary
}

fn file_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn make_session(root: &Path, account: &str, workspace: &str, local: &str) -> PathBuf {
        let session = root.join(account).join(workspace).join(local);
        fs::create_dir_all(session.join(".claude")).unwrap();
        session
    }

    #[test]
    fn ids_come_from_parent_segments() {
        let ids = session_ids(Path::new("/root/acct/ws/local_1"));
        assert_eq!(ids.account_id, "acct");
        assert_eq!(ids.workspace_id, "ws");
    }

    #[tokio::test]
    async fn discovers_only_qualifying_sessions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        let good = make_session(root, "acct", "ws", "local_a");
        fs::create_dir_all(root.join("acct/ws/local_b")).unwrap(); // no .claude
        make_session(root, "acct", "ws", "other_c");
        fs::write(root.join("acct/ws/local_a.json"), r#"{"sessionTitle":"Fix bug"}"#).unwrap();

        let bridge = BridgeDir::for_session(&good);
        fs::create_dir_all(bridge.root()).unwrap();
        fs::write(bridge.status_file(), r#"{"status":"watching"}"#).unwrap();

        let resolver = SessionResolver::new(root, None);
        let sessions = list_sessions(&resolver).await;

        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.id, "local_a");
        assert_eq!(session.account_id, "acct");
        assert_eq!(session.workspace_id, "ws");
        assert_eq!(session.title, "Fix bug");
        assert!(session.meta_exists);
        assert_eq!(session.bridge_status, "watching");
    }

    #[tokio::test]
    async fn bridge_status_missing_when_no_status_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        make_session(dir.path(), "a", "w", "local_x");

        let sessions = list_sessions(&SessionResolver::new(dir.path(), None)).await;
        assert_eq!(sessions[0].bridge_status, "missing");
        assert!(!sessions[0].meta_exists);
    }

    #[tokio::test]
    async fn direct_mode_reports_single_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolver = SessionResolver::new("/nonexistent", Some(dir.path()));

        let sessions = list_sessions(&resolver).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, DIRECT_SESSION_ID);
        assert_eq!(sessions[0].bridge_status, "unknown");
    }

    #[tokio::test]
    async fn summary_counts_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bridge = BridgeDir::new(dir.path());
        fs::create_dir_all(bridge.requests_dir()).unwrap();
        fs::create_dir_all(bridge.streams_dir()).unwrap();
        fs::write(bridge.request_file("a"), "{}").unwrap();
        fs::write(bridge.request_file("b"), "{}").unwrap();
        fs::write(bridge.processing_marker("a"), "").unwrap();
        fs::write(bridge.stream_file("a"), "line").unwrap();

        let summary = session_summary(&bridge).await;
        assert_eq!(summary.status, "unknown");
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.responses, 0);
        assert_eq!(summary.streams, 1);
        assert!(summary.last_activity.is_some());
    }

    #[tokio::test]
    async fn meta_lifts_system_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = make_session(dir.path(), "a", "w", "local_m");
        fs::write(
            dir.path().join("a/w/local_m.json"),
            r#"{"title":"T","systemPrompt":"be nice"}"#,
        )
        .unwrap();

        let resolver = SessionResolver::new(dir.path(), None);
        let meta = session_meta(&resolver, &session).await;
        assert_eq!(meta.session_id, "local_m");
        assert_eq!(meta.title, "T");
        assert_eq!(meta.system_prompt.as_deref(), Some("be nice"));
        assert!(meta.pretty.unwrap().contains("(see System Prompt below)"));
    }

    #[tokio::test]
    async fn meta_of_sessions_root_is_missing() {
        let base = tempfile::tempdir().expect("tempdir");
        let root = base.path().join("sessions");
        fs::create_dir_all(&root).unwrap();
        fs::write(base.path().join("sessions.json"), r#"{"title":"outside"}"#).unwrap();
        let resolver = SessionResolver::new(&root, None);

        let meta = session_meta(&resolver, &root).await;
        assert_eq!(meta.path, None);
        assert_eq!(meta.raw, None);
        assert_eq!(meta.title, "");
    }

    #[tokio::test]
    async fn meta_of_direct_bridge_is_missing() {
        let base = tempfile::tempdir().expect("tempdir");
        let direct = base.path().join("bridge");
        fs::create_dir_all(&direct).unwrap();
        fs::write(base.path().join("bridge.json"), r#"{"title":"outside"}"#).unwrap();
        let resolver = SessionResolver::new(base.path().join("sessions"), Some(direct.as_path()));

        let meta = session_meta(&resolver, &direct).await;
        assert_eq!(meta.path, None);
        assert_eq!(meta.raw, None);
    }

    #[tokio::test]
    async fn config_falls_back_to_workspace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = make_session(dir.path(), "a", "w", "local_c");

        assert_eq!(session_config(&session).await.scope, ConfigScope::Missing);

        fs::write(dir.path().join("a/w").join(SESSION_CONFIG_FILE), "{}").unwrap();
        let config = session_config(&session).await;
        assert_eq!(config.scope, ConfigScope::Workspace);
        assert_eq!(config.dir, dir.path().join("a/w"));

        fs::write(session.join(SESSION_CONFIG_FILE), "{}").unwrap();
        assert_eq!(session_config(&session).await.scope, ConfigScope::Session);
    }

    #[tokio::test]
    async fn plugin_base_prefers_existing_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("sessions");
        let session = make_session(&root, "acct", "ws", "local_p");

        assert_eq!(
            plugin_base(&root, &session).await,
            root.join("skills-plugin/ws/acct")
        );

        fs::create_dir_all(root.join("skills-plugin/acct/ws")).unwrap();
        assert_eq!(
            plugin_base(&root, &session).await,
            root.join("skills-plugin/acct/ws")
        );
    }
}
