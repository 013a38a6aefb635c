//! Shared query parameter types for handlers.

use std::path::PathBuf;

use bridge_core::bridge::is_valid_job_id;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// `?path=` naming a session directory.
#[derive(Debug, Default, Deserialize)]
pub struct SessionParams {
    #[serde(default)]
    pub path: String,
}

/// `?path=&id=` naming a job within a session.
#[derive(Debug, Default, Deserialize)]
pub struct JobParams {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub id: String,
}

impl AppState {
    /// Resolve an untrusted session path; anything outside the sessions
    /// root is reported as not found.
    pub fn session_path(&self, raw: &str) -> AppResult<PathBuf> {
        self.resolver.resolve(raw).ok_or(AppError::NotFound)
    }
}

impl JobParams {
    /// Validated job id.
    pub fn job_id(&self) -> AppResult<&str> {
        if is_valid_job_id(&self.id) {
            Ok(&self.id)
        } else {
            Err(AppError::NotFound)
        }
    }
}
