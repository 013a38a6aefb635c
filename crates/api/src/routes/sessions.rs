//! Route definitions for sessions and their jobs.

use axum::routing::get;
use axum::Router;

use crate::handlers::{jobs, sessions};
use crate::state::AppState;

/// Session and job routes. Every `path` parameter goes through the
/// session resolver; `id` parameters are validated before use.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/session", get(sessions::session_page))
        .route("/session/summary", get(sessions::session_summary))
        .route("/session/meta", get(sessions::session_meta))
        .route("/session/logs", get(sessions::session_logs))
        .route("/session/jobs", get(jobs::list_jobs))
        .route("/session/job", get(jobs::job_page).post(jobs::submit_job))
        .route("/session/stream", get(jobs::job_stream))
}
