//! Job enumeration over a bridge directory.
//!
//! A job exists when `requests/<id>.json` or `responses/<id>.json` exists;
//! the id set is the union of both directories' stems. All reads are
//! independent and run concurrently. Nothing is locked: the external agent
//! may be writing while we read, and a torn view is acceptable.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;

use crate::bridge::BridgeDir;
use crate::job::{self, JobArtifacts};
use crate::scan;

/// One row of the job list.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub id: String,
    pub status: String,
    pub job_type: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub summary: String,
}

impl JobSummary {
    /// Sort key; jobs without a parseable timestamp count as oldest.
    pub fn recency_millis(&self) -> i64 {
        self.updated_at.map_or(0, |ts| ts.timestamp_millis())
    }
}

/// Everything known about a single job.
///
/// Raw artifact contents are `None` when the file is absent, so an empty
/// file (`Some("")`) stays distinguishable from a missing one.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetail {
    pub id: String,
    pub status: String,
    pub job_type: String,
    pub request_path: Option<PathBuf>,
    pub response_path: Option<PathBuf>,
    pub request_raw: Option<String>,
    pub response_raw: Option<String>,
}

/// Union of request and response stems.
pub async fn job_ids(bridge: &BridgeDir) -> BTreeSet<String> {
    let requests_dir = bridge.requests_dir();
    let responses_dir = bridge.responses_dir();
    let (requests, responses) = tokio::join!(
        scan::list_stems(&requests_dir, "json"),
        scan::list_stems(&responses_dir, "json"),
    );
    requests.into_iter().chain(responses).collect()
}

/// All jobs in `bridge`, newest first.
pub async fn list_jobs(bridge: &BridgeDir) -> Vec<JobSummary> {
    let ids = job_ids(bridge).await;
    let mut jobs = join_all(ids.iter().map(|id| load_summary(bridge, id))).await;
    jobs.sort_by_key(|job| std::cmp::Reverse(job.recency_millis()));
    jobs
}

/// Detail view of `id`. Ids with no artifacts report `unknown`.
pub async fn job_detail(bridge: &BridgeDir, id: &str) -> JobDetail {
    let request_path = bridge.request_file(id);
    let response_path = bridge.response_file(id);
    let marker = bridge.processing_marker(id);

    let (request_raw, response_raw, processing) = tokio::join!(
        scan::read_text(&request_path),
        scan::read_text(&response_path),
        scan::exists(&marker),
    );

    let request = parse(request_raw.as_deref());
    let response = parse(response_raw.as_deref());
    let artifacts = JobArtifacts {
        request: request.as_ref(),
        response: response.as_ref(),
        processing,
    };

    JobDetail {
        id: id.to_string(),
        status: job::derive_status(&artifacts),
        job_type: job::derive_type(&artifacts),
        request_path: request_raw.as_ref().map(|_| request_path),
        response_path: response_raw.as_ref().map(|_| response_path),
        request_raw,
        response_raw,
    }
}

async fn load_summary(bridge: &BridgeDir, id: &str) -> JobSummary {
    let request_path = bridge.request_file(id);
    let response_path = bridge.response_file(id);
    let marker = bridge.processing_marker(id);
    let (request, response, processing) = tokio::join!(
        scan::read_json(&request_path),
        scan::read_json(&response_path),
        scan::exists(&marker),
    );
    let artifacts = JobArtifacts {
        request: request.as_ref(),
        response: response.as_ref(),
        processing,
    };

    JobSummary {
        id: id.to_string(),
        status: job::derive_status(&artifacts),
        job_type: job::derive_type(&artifacts),
        updated_at: job::derive_updated_at(&artifacts),
        summary: job::derive_summary(artifacts.request.or(artifacts.response)),
    }
}

fn parse(raw: Option<&str>) -> Option<Value> {
    raw.and_then(|text| serde_json::from_str(text).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn bridge() -> (tempfile::TempDir, BridgeDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let bridge = BridgeDir::new(dir.path());
        fs::create_dir_all(bridge.requests_dir()).unwrap();
        fs::create_dir_all(bridge.responses_dir()).unwrap();
        (dir, bridge)
    }

    fn write(path: PathBuf, body: &str) {
        fs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn missing_bridge_dir_has_no_jobs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bridge = BridgeDir::new(dir.path().join("nope"));
        assert!(list_jobs(&bridge).await.is_empty());
    }

    #[tokio::test]
    async fn ids_are_union_of_requests_and_responses() {
        let (_dir, bridge) = bridge();
        write(bridge.request_file("a"), "{}");
        write(bridge.request_file("b"), "{}");
        write(bridge.response_file("b"), r#"{"status":"completed"}"#);
        write(bridge.response_file("c"), r#"{"status":"completed"}"#);
        write(bridge.processing_marker("a"), "");

        let ids: Vec<String> = job_ids(&bridge).await.into_iter().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_derives_status_per_job() {
        let (_dir, bridge) = bridge();
        write(bridge.request_file("running"), r#"{"type":"exec","command":"ls"}"#);
        write(bridge.processing_marker("running"), "");
        write(bridge.request_file("failed"), r#"{"type":"exec"}"#);
        write(bridge.processing_marker("failed"), "");
        write(bridge.response_file("failed"), r#"{"status":"failed"}"#);
        write(bridge.request_file("pending"), r#"{"type":"http","url":"http://x"}"#);

        let jobs = list_jobs(&bridge).await;
        let status_of = |id: &str| {
            jobs.iter()
                .find(|job| job.id == id)
                .map(|job| job.status.clone())
        };
        assert_eq!(status_of("running").as_deref(), Some("running"));
        assert_eq!(status_of("failed").as_deref(), Some("failed"));
        assert_eq!(status_of("pending").as_deref(), Some("pending"));

        let pending = jobs.iter().find(|job| job.id == "pending").unwrap();
        assert_eq!(pending.job_type, "http");
        assert_eq!(pending.summary, "http://x");
    }

    #[tokio::test]
    async fn list_is_newest_first_with_untimed_last() {
        let (_dir, bridge) = bridge();
        write(
            bridge.request_file("old"),
            r#"{"timestamp":"2024-01-01T00:00:00Z"}"#,
        );
        write(
            bridge.request_file("new"),
            r#"{"timestamp":"2024-06-01T00:00:00Z"}"#,
        );
        write(bridge.request_file("untimed"), "{}");
        write(
            bridge.response_file("old"),
            r#"{"status":"completed","timestamp":"2024-12-01T00:00:00Z"}"#,
        );

        let order: Vec<String> = list_jobs(&bridge).await.into_iter().map(|j| j.id).collect();
        assert_eq!(order, vec!["old", "new", "untimed"]);
    }

    #[tokio::test]
    async fn detail_of_unknown_id_reports_unknown_and_absent_files() {
        let (_dir, bridge) = bridge();
        let detail = job_detail(&bridge, "ghost").await;

        assert_eq!(detail.status, "unknown");
        assert_eq!(detail.job_type, "");
        assert!(detail.request_raw.is_none());
        assert!(detail.response_raw.is_none());
        assert!(detail.request_path.is_none());
    }

    #[tokio::test]
    async fn detail_distinguishes_empty_from_missing() {
        let (_dir, bridge) = bridge();
        write(bridge.request_file("empty"), "");

        let detail = job_detail(&bridge, "empty").await;
        assert_eq!(detail.request_raw.as_deref(), Some(""));
        assert!(detail.response_raw.is_none());
        assert_eq!(detail.request_path, Some(bridge.request_file("empty")));
        // Unparseable request counts as absent for status purposes.
        assert_eq!(detail.status, "unknown");
    }

    #[tokio::test]
    async fn detail_honours_processing_marker() {
        let (_dir, bridge) = bridge();
        write(bridge.request_file("j"), r#"{"type":"git"}"#);
        write(bridge.processing_marker("j"), "");

        let detail = job_detail(&bridge, "j").await;
        assert_eq!(detail.status, "running");
        assert_eq!(detail.job_type, "git");
    }
}
