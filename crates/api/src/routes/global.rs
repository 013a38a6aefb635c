use axum::routing::get;
use axum::Router;

use crate::handlers::global;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/global", get(global::global_page))
        .route("/global/details", get(global::global_details))
        .route("/daemon", get(global::daemon_page))
        .route("/daemon/auto-setup", get(global::daemon_auto_setup))
        .route("/daemon/watcher", get(global::daemon_watcher))
}
