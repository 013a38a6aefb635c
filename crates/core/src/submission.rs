//! Job submission: compose a request artifact and write it.
//!
//! This is the one place the core creates anything on disk. Ids combine a
//! second-resolution local timestamp with four random hex digits; a
//! collision is possible in principle and is not retried.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use rand::Rng;
use serde_json::{Map, Number, Value};

use crate::bridge::BridgeDir;
use crate::error::CoreError;

/// Job type used when the form leaves it empty.
pub const DEFAULT_JOB_TYPE: &str = "exec";

/// Raw form input for a new job. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct JobSubmission {
    pub job_type: String,
    /// Literal JSON payload; wins over `quick` when non-blank.
    pub payload: String,
    /// Single value mapped into a payload by job type.
    pub quick: String,
    /// Timeout in seconds.
    pub timeout: String,
    pub cwd: String,
}

impl JobSubmission {
    /// The declared type, or [`DEFAULT_JOB_TYPE`].
    pub fn job_type(&self) -> &str {
        let trimmed = self.job_type.trim();
        if trimmed.is_empty() {
            DEFAULT_JOB_TYPE
        } else {
            trimmed
        }
    }
}

/// Map a quick value into a payload object for `job_type`.
///
/// | type   | payload                              |
/// |--------|--------------------------------------|
/// | http   | `{url, method: "GET"}`               |
/// | prompt | `{prompt}`                           |
/// | env    | `{key, value: ""}`                   |
/// | file   | `{action: "read", path}`             |
/// | other  | `{command}`                          |
pub fn quick_payload(job_type: &str, quick: &str) -> Map<String, Value> {
    let quick = Value::String(quick.to_string());
    let pairs: Vec<(&str, Value)> = match job_type {
        "http" => vec![("url", quick), ("method", Value::from("GET"))],
        "prompt" => vec![("prompt", quick)],
        "env" => vec![("key", quick), ("value", Value::from(""))],
        "file" => vec![("action", Value::from("read")), ("path", quick)],
        _ => vec![("command", quick)],
    };
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Build the request object for `submission` without touching the disk.
///
/// The literal payload must be a JSON object. `timeout` and `cwd` are
/// merged in on both paths; `id`, `timestamp` and `type` always override
/// payload fields of the same name.
pub fn compose_request(
    submission: &JobSubmission,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Map<String, Value>, CoreError> {
    let job_type = submission.job_type();

    let mut request = if !submission.payload.trim().is_empty() {
        match serde_json::from_str::<Value>(&submission.payload) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(CoreError::Validation(
                    "Payload JSON must be an object".into(),
                ))
            }
            Err(err) => return Err(CoreError::Validation(err.to_string())),
        }
    } else if !submission.quick.is_empty() {
        quick_payload(job_type, &submission.quick)
    } else {
        Map::new()
    };

    let timeout = submission.timeout.trim();
    if !timeout.is_empty() {
        request.insert("timeout".into(), Value::Number(parse_number(timeout)?));
    }
    if !submission.cwd.is_empty() {
        request.insert("cwd".into(), Value::String(submission.cwd.clone()));
    }

    request.insert("id".into(), Value::String(id.to_string()));
    request.insert(
        "timestamp".into(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    request.insert("type".into(), Value::String(job_type.to_string()));

    Ok(request)
}

/// `job-YYYYMMDD-HHMMSS-xxxx` with four random lowercase hex digits.
pub fn generate_job_id(now: DateTime<Local>) -> String {
    let suffix: u16 = rand::rng().random();
    format!("job-{}-{suffix:04x}", now.format("%Y%m%d-%H%M%S"))
}

/// Validate `submission`, write `requests/<id>.json` under `bridge` and
/// return the new job id.
///
/// Validation runs before `requests/` is created.
pub async fn submit_job(bridge: &BridgeDir, submission: &JobSubmission) -> Result<String, CoreError> {
    let now = Utc::now();
    let id = generate_job_id(now.with_timezone(&Local));
    let request = compose_request(submission, &id, now)?;

    let body = serde_json::to_string_pretty(&Value::Object(request))
        .map_err(|err| CoreError::Internal(err.to_string()))?;

    tokio::fs::create_dir_all(bridge.requests_dir()).await?;
    tokio::fs::write(bridge.request_file(&id), body).await?;

    Ok(id)
}

fn parse_number(raw: &str) -> Result<Number, CoreError> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Number::from(int));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CoreError::Validation(format!("Timeout must be a number, got '{raw}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
