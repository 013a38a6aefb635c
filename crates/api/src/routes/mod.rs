pub mod actions;
pub mod global;
pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the dashboard route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                      health check (public)
///
/// /                            session list
/// /session                     session page (tabs)
/// /session/summary             summary fragment
/// /session/meta                session JSON page
/// /session/jobs                job table fragment
/// /session/job                 job page (GET), submit job (POST)
/// /session/stream              stream tail fragment
/// /session/logs                bridge log tail fragment
///
/// /global                      global maintenance page
/// /global/details              newest-session details fragment
/// /daemon                      daemon page
/// /daemon/auto-setup           auto-setup daemon fragment
/// /daemon/watcher              watcher fragment
///
/// /actions/session             run a session action (POST)
/// /actions/global              run a global action (POST)
/// ```
///
/// Page and fragment routes sit behind the request timeout. Action routes
/// do not: each script carries its own timeout, some longer than the
/// request timeout.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(sessions::router())
        .merge(global::router())
}

pub fn action_routes() -> Router<AppState> {
    actions::router()
}
