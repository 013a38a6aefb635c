//! Handlers for the session list and per-session pages.

use axum::extract::{Query, State};
use axum::response::Html;
use bridge_core::{presets, scan, sessions};

use crate::error::AppResult;
use crate::query::SessionParams;
use crate::state::AppState;
use crate::views::{layout, pages, tools, Nav};

/// Lines of `logs/bridge.log` shown on session and job pages.
pub const LOG_TAIL_LINES: usize = 200;

/// GET /
///
/// All discovered sessions, newest first.
pub async fn list_sessions(State(state): State<AppState>) -> Html<String> {
    let sessions = sessions::list_sessions(&state.resolver).await;
    tracing::debug!(count = sessions.len(), "Listed sessions");
    Html(layout(
        "Cowork Bridge UI",
        &pages::sessions(&sessions),
        Nav::Sessions,
    ))
}

/// GET /session?path=
pub async fn session_page(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;

    let user_prompts = state.config.user_prompts_dir();
    let (config, presets) = tokio::join!(
        sessions::session_config(&session),
        presets::list_presets(&user_prompts, &state.config.prompts_dir),
    );
    let tools_html = tools::session_tools(&session, &config, &presets, state.resolver.is_direct());

    Ok(Html(layout(
        "Session",
        &pages::session_page(&session, &tools_html),
        Nav::Sessions,
    )))
}

/// GET /session/summary?path=
///
/// Fragment polled every 3s from the overview tab.
pub async fn session_summary(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let summary = sessions::session_summary(&state.resolver.bridge_dir(&session)).await;
    Ok(Html(pages::summary(&summary)))
}

/// GET /session/meta?path=
pub async fn session_meta(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let meta = sessions::session_meta(&state.resolver, &session).await;
    Ok(Html(layout(
        &format!("Session {}", meta.session_id),
        &pages::session_meta(&meta, &session),
        Nav::Sessions,
    )))
}

/// GET /session/logs?path=
pub async fn session_logs(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let bridge = state.resolver.bridge_dir(&session);
    let tail = scan::tail(&bridge.bridge_log(), LOG_TAIL_LINES).await;
    Ok(Html(pages::logs(tail.as_deref())))
}
