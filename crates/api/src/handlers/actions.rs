//! Handlers for maintenance actions.
//!
//! Each action resolves to an [`ActionPlan`]; planning failures (unknown
//! action, missing input, missing confirmation) are rendered like a failed
//! run with exit code 1 so the user always lands on a result page.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use bridge_core::actions::{self, ActionParams, ActionPlan, SessionTarget};
use bridge_core::scripting::{run_command, CommandOutput};
use bridge_core::{presets, sessions};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{layout, pages, tools, Nav};

/// Run a plan, folding every failure into a [`CommandOutput`].
async fn execute(action: &str, plan: &ActionPlan) -> CommandOutput {
    let output = match &plan.invocation {
        Ok(invocation) => run_command(invocation)
            .await
            .unwrap_or_else(CommandOutput::from),
        Err(err) => CommandOutput::failed(err.to_string()),
    };
    tracing::info!(
        action,
        exit_code = output.exit_code,
        duration_ms = output.duration_ms,
        "Action finished",
    );
    output
}

fn result_page(title: &str, output: &CommandOutput, back: &str) -> Html<String> {
    Html(layout(title, &tools::action_result(title, output, back), Nav::Sessions))
}

/// POST /actions/session
///
/// Requires `action` and a resolvable `path`. Every session action needs
/// `cowork_settings.json` in the session or its workspace directory.
pub async fn session_action(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let params = ActionParams::new(fields);
    let action = params.get("action").ok_or(AppError::NotFound)?.to_string();
    let session = state.session_path(params.get("path").unwrap_or_default())?;

    let config = sessions::session_config(&session).await;
    if !config.exists() {
        tracing::warn!(%action, session = %session.display(), "Session config missing");
        let output = CommandOutput::failed(format!(
            "This action requires cowork_settings.json. Looked for: {}",
            config.path.display()
        ));
        return Ok(result_page("Session Tools Unavailable", &output, "/"));
    }

    let presets =
        presets::list_presets(&state.config.user_prompts_dir(), &state.config.prompts_dir).await;
    let target = SessionTarget {
        session: &session,
        config_dir: &config.dir,
        presets: &presets,
    };
    let plan = actions::plan_session_action(&state.action_env(), &action, target, &params);
    let output = execute(&action, &plan).await;

    Ok(result_page(
        plan.title,
        &output,
        &pages::session_url("", &session, None),
    ))
}

/// POST /actions/global
///
/// The result page links back to `origin` when it is `/global` or
/// `/daemon`, otherwise to `/`.
pub async fn global_action(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let params = ActionParams::new(fields);
    let action = params.get("action").unwrap_or_default().to_string();
    let back = actions::global_back_link(params.get("origin"));

    let plan = actions::plan_global_action(&state.action_env(), &action, &params);
    let output = execute(&action, &plan).await;

    result_page(plan.title, &output, back)
}
