//! Pure job derivations over request/response artifacts.
//!
//! A job's status, type, recency and one-line summary are never stored;
//! they are computed from whichever artifacts exist. Everything here is
//! free of I/O so it can be checked against synthetic artifact sets.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Status of a job whose request exists but nobody picked it up yet.
pub const STATUS_PENDING: &str = "pending";

/// Status of a job whose processing marker exists.
pub const STATUS_RUNNING: &str = "running";

/// Status when no artifact says anything.
pub const STATUS_UNKNOWN: &str = "unknown";

/// Maximum summary length in characters, including the ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 64;

/// The artifacts observed for one job id.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobArtifacts<'a> {
    /// Parsed `requests/<id>.json`.
    pub request: Option<&'a Value>,
    /// Parsed `responses/<id>.json`.
    pub response: Option<&'a Value>,
    /// Whether `requests/<id>.json.processing` exists.
    pub processing: bool,
}

type StatusRule = fn(&JobArtifacts<'_>) -> Option<String>;

/// Evaluated top to bottom; the first rule that matches decides.
const STATUS_RULES: [StatusRule; 3] = [response_status, processing_status, request_status];

fn response_status(artifacts: &JobArtifacts<'_>) -> Option<String> {
    non_empty_str(artifacts.response?, "status").map(str::to_string)
}

fn processing_status(artifacts: &JobArtifacts<'_>) -> Option<String> {
    artifacts.processing.then(|| STATUS_RUNNING.to_string())
}

fn request_status(artifacts: &JobArtifacts<'_>) -> Option<String> {
    artifacts.request.map(|_| STATUS_PENDING.to_string())
}

/// Derive the job status: response > processing marker > request > unknown.
///
/// A response only decides when it declares a non-empty string `status`.
pub fn derive_status(artifacts: &JobArtifacts<'_>) -> String {
    STATUS_RULES
        .iter()
        .find_map(|rule| rule(artifacts))
        .unwrap_or_else(|| STATUS_UNKNOWN.to_string())
}

/// Request `type`, else response `response_type`, else empty.
pub fn derive_type(artifacts: &JobArtifacts<'_>) -> String {
    artifacts
        .request
        .and_then(|request| non_empty_str(request, "type"))
        .or_else(|| {
            artifacts
                .response
                .and_then(|response| non_empty_str(response, "response_type"))
        })
        .unwrap_or_default()
        .to_string()
}

/// Timestamp of the response if it declares one, else of the request.
///
/// `None` when the chosen artifact's timestamp does not parse.
pub fn derive_updated_at(artifacts: &JobArtifacts<'_>) -> Option<DateTime<Utc>> {
    let declared = [artifacts.response, artifacts.request]
        .into_iter()
        .flatten()
        .filter_map(|artifact| artifact.get("timestamp"))
        .find(|value| !is_blank(value))?;
    parse_timestamp(declared)
}

/// Parse an RFC 3339 string, a naive ISO date-time (taken as UTC), or a
/// number of epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
                return Some(parsed.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()
                .map(|naive| naive.and_utc())
        }
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// One-line description of a payload.
///
/// Field priority: `command`, `url`, `prompt`, `action` + `path`, `key`.
pub fn derive_summary(payload: Option<&Value>) -> String {
    let Some(payload) = payload else {
        return String::new();
    };

    let text = if let Some(command) = non_empty_str(payload, "command") {
        command.to_string()
    } else if let Some(url) = non_empty_str(payload, "url") {
        url.to_string()
    } else if let Some(prompt) = non_empty_str(payload, "prompt") {
        prompt.to_string()
    } else if let (Some(action), Some(path)) = (
        non_empty_str(payload, "action"),
        non_empty_str(payload, "path"),
    ) {
        format!("{action} {path}")
    } else if let Some(key) = non_empty_str(payload, "key") {
        format!("env {key}")
    } else {
        String::new()
    };

    truncate(&text, SUMMARY_MAX_CHARS)
}

/// Cut `value` to at most `max` characters, ending in `…` when cut.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
