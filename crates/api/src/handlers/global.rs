//! Handlers for the global and daemon pages and their polled fragments.

use axum::extract::State;
use axum::response::Html;
use bridge_core::{scan, services, sessions};

use crate::state::AppState;
use crate::views::tools::{self, GlobalDetails};
use crate::views::{layout, Nav};

/// Lines of the watcher log shown on the daemon page.
const WATCHER_TAIL_LINES: usize = 60;

/// Skill directory below a plugin base.
const SKILL_SUBPATH: [&str; 2] = ["skills", "cowork-bridge"];

/// GET /global
pub async fn global_page() -> Html<String> {
    Html(layout("Global Maintenance", &tools::global_page(), Nav::Global))
}

/// GET /global/details
///
/// Account, workspace and skill install state of the newest session.
pub async fn global_details(State(state): State<AppState>) -> Html<String> {
    let sessions = sessions::list_sessions(&state.resolver).await;
    let Some(latest) = sessions.first() else {
        return Html(tools::global_details(None));
    };

    let ids = sessions::session_ids(&latest.path);
    let mut install_path =
        sessions::plugin_base(state.resolver.sessions_root(), &latest.path).await;
    install_path.extend(SKILL_SUBPATH);

    let details = GlobalDetails {
        session_id: latest.id.clone(),
        session_path: latest.path.display().to_string(),
        account_id: ids.account_id,
        workspace_id: ids.workspace_id,
        install_exists: scan::exists(&install_path).await,
        install_path: install_path.display().to_string(),
    };
    Html(tools::global_details(Some(&details)))
}

/// GET /daemon
pub async fn daemon_page() -> Html<String> {
    Html(layout("Daemon Management", &tools::daemon_page(), Nav::Daemon))
}

/// GET /daemon/auto-setup
pub async fn daemon_auto_setup(State(state): State<AppState>) -> Html<String> {
    let status = services::daemon_status(&state.config.launchd_plist).await;
    tracing::debug!(status = status.as_str(), "Checked auto-setup daemon");
    Html(tools::daemon_tools(status, &state.config.launchd_plist))
}

/// GET /daemon/watcher
pub async fn daemon_watcher(State(state): State<AppState>) -> Html<String> {
    let (watcher, log) = tokio::join!(
        services::watcher_status(),
        scan::tail(&state.config.watcher_log, WATCHER_TAIL_LINES),
    );
    Html(tools::watcher_tools(&watcher, log.as_deref()))
}
