use axum::routing::post;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actions/session", post(actions::session_action))
        .route("/actions/global", post(actions::global_action))
}
