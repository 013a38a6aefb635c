//! Handlers for jobs within a session.
//!
//! Jobs are read straight from the bridge directory on every request; the
//! only write is [`submit_job`], which drops a new request file for the
//! external agent to pick up.

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Form;
use bridge_core::error::CoreError;
use bridge_core::submission::JobSubmission;
use bridge_core::{aggregator, scan, submission};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::sessions::LOG_TAIL_LINES;
use crate::query::{JobParams, SessionParams};
use crate::state::AppState;
use crate::views::{layout, pages, Nav};

/// Form posted by the "Create Request" panel.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitJobForm {
    pub path: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: String,
    pub quick: String,
    pub timeout: String,
    pub cwd: String,
}

impl SubmitJobForm {
    fn submission(&self) -> JobSubmission {
        JobSubmission {
            job_type: self.job_type.clone(),
            payload: self.payload.clone(),
            quick: self.quick.clone(),
            timeout: self.timeout.clone(),
            cwd: self.cwd.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /session/jobs?path=
///
/// Job table fragment, newest first. Polled every 3s.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let jobs = aggregator::list_jobs(&state.resolver.bridge_dir(&session)).await;
    Ok(Html(pages::jobs(&jobs, &session)))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /session/job?path=&id=
///
/// Unknown ids still render, with status `unknown` and both artifacts
/// marked missing.
pub async fn job_page(
    State(state): State<AppState>,
    Query(params): Query<JobParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let id = params.job_id()?;
    let detail = aggregator::job_detail(&state.resolver.bridge_dir(&session), id).await;

    Ok(Html(layout(
        &format!("Job {id}"),
        &pages::job_page(&detail, &session),
        Nav::Sessions,
    )))
}

/// GET /session/stream?path=&id=
pub async fn job_stream(
    State(state): State<AppState>,
    Query(params): Query<JobParams>,
) -> AppResult<Html<String>> {
    let session = state.session_path(&params.path)?;
    let id = params.job_id()?;
    let stream_file = state.resolver.bridge_dir(&session).stream_file(id);
    let tail = scan::tail(&stream_file, LOG_TAIL_LINES).await;
    Ok(Html(pages::stream(tail.as_deref())))
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /session/job
///
/// Write a new request artifact and redirect (302) to its job page.
/// Invalid input answers 400 with a link back to the session.
pub async fn submit_job(
    State(state): State<AppState>,
    Form(form): Form<SubmitJobForm>,
) -> AppResult<impl IntoResponse> {
    let session = state.session_path(&form.path)?;
    let bridge = state.resolver.bridge_dir(&session);
    let submission = form.submission();

    let id = submission::submit_job(&bridge, &submission)
        .await
        .map_err(|err| match err {
            CoreError::Validation(message) => AppError::BadRequest {
                message,
                back: pages::session_url("", &session, None),
            },
            other => other.into(),
        })?;

    tracing::info!(
        job_id = %id,
        job_type = %submission.job_type(),
        session = %session.display(),
        "Job submitted",
    );

    let location = pages::session_url("/job", &session, Some(&id));
    Ok((StatusCode::FOUND, [(LOCATION, location)]))
}
