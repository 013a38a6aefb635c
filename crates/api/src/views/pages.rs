//! Session and job views: full pages and the fragments they poll.

use std::path::Path;
use std::time::SystemTime;

use bridge_core::aggregator::{JobDetail, JobSummary};
use bridge_core::sessions::{Session, SessionMeta, SessionSummary};
use chrono::{DateTime, Local, Utc};

use super::layout::{encode, escape_html};

/// Job types offered by the request form.
const JOB_TYPES: &[&str] = &["exec", "http", "git", "node", "docker", "prompt", "env", "file"];

/// Status pill. Unknown labels get the neutral style.
pub fn badge(status: &str) -> String {
    let label = if status.is_empty() { "unknown" } else { status };
    let tone = match label.to_lowercase().as_str() {
        "completed" | "ready" | "watching" | "installed" | "loaded" => " ok",
        "failed" | "error" => " fail",
        "pending" | "running" | "streaming" => " warn",
        _ => "",
    };
    format!(r#"<span class="badge{tone}">{}</span>"#, escape_html(label))
}

pub fn format_system_time(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn format_utc(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn kv(label: &str, value_html: &str) -> String {
    format!(
        r#"<div class="kv"><strong>{label}</strong><span>{value_html}</span></div>"#
    )
}

fn mono(value: &str) -> String {
    format!(r#"<span class="mono">{}</span>"#, escape_html(value))
}

/// Placeholder element the client engine polls.
pub fn poll(url: &str, every: &str) -> String {
    format!(
        r#"<div hx-get="{}" hx-trigger="load, every {every}" hx-swap="innerHTML"></div>"#,
        escape_html(url)
    )
}

/// `/session/<suffix>?path=<session>` with an optional job id.
pub fn session_url(suffix: &str, session: &Path, id: Option<&str>) -> String {
    let mut url = format!("/session{suffix}?path={}", encode(&session.display().to_string()));
    if let Some(id) = id {
        url.push_str("&id=");
        url.push_str(&encode(id));
    }
    url
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub fn sessions(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return r#"
      <div class="panel">
        <h2>No sessions found</h2>
        <p class="notice">Point the UI at a bridge directory with <code>BRIDGE_DIR</code> or ensure Cowork has an active session.</p>
      </div>"#
            .to_string();
    }

    let rows: String = sessions
        .iter()
        .map(|session| {
            let meta_label = session
                .meta_path
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "local_*.json".into());
            let missing = if session.meta_exists {
                ""
            } else {
                r#" <span class="tag">(missing)</span>"#
            };
            let title = if session.title.is_empty() {
                "Untitled"
            } else {
                &session.title
            };
            format!(
                r#"
        <tr>
          <td><a href="{}">{}</a></td>
          <td><a href="{}">{}</a>{missing}</td>
          <td>{}</td>
          <td class="mono">{}</td>
        </tr>"#,
                session_url("", &session.path, None),
                escape_html(title),
                session_url("/meta", &session.path, None),
                escape_html(&meta_label),
                badge(&session.bridge_status),
                escape_html(&format_system_time(session.modified)),
            )
        })
        .collect();

    format!(
        r#"
    <div class="panel">
      <h2>Sessions</h2>
      <p class="panel-subtitle">Latest Cowork sessions detected on this machine.</p>
      <table class="table">
        <thead>
          <tr><th>Title</th><th>Session JSON</th><th>Bridge</th><th>Modified</th></tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>
    </div>"#
    )
}

pub fn summary(summary: &SessionSummary) -> String {
    let last = format_system_time(summary.last_activity);
    let cells = [
        kv("Bridge Dir", &mono(&summary.bridge_dir.display().to_string())),
        kv("Status", &badge(&summary.status)),
        kv("Requests", &summary.requests.to_string()),
        kv("Responses", &summary.responses.to_string()),
        kv("Streams", &summary.streams.to_string()),
        kv("Last Activity", &mono(if last.is_empty() { "n/a" } else { &last })),
    ];
    format!(
        r#"
    <div class="panel">
      <h2>Session Summary</h2>
      <div class="grid cols-2">{}</div>
    </div>"#,
        cells.join("")
    )
}

pub fn session_meta(meta: &SessionMeta, session: &Path) -> String {
    let prompt_section = meta
        .system_prompt
        .as_deref()
        .map(|prompt| {
            format!(
                r#"
    <div class="panel">
      <h2>System Prompt</h2>
      <p class="panel-subtitle">Rendered with line wrapping for readability.</p>
      <pre class="pre-scroll pre-wrap">{}</pre>
    </div>"#,
                escape_html(prompt)
            )
        })
        .unwrap_or_default();

    let raw = meta.raw.as_deref().unwrap_or("(missing)");
    let pretty = meta.pretty.as_deref().unwrap_or(raw);
    let title = if meta.title.is_empty() {
        "Untitled"
    } else {
        &meta.title
    };

    format!(
        r#"
    <div class="panel">
      <div class="breadcrumbs"><a href="/">Sessions</a> / <a href="{}">Session</a> / Meta</div>
      <h2>Session JSON</h2>
      <p class="panel-subtitle">{} - {}</p>
      {}
      <pre class="pre-scroll">{}</pre>
      <details>
        <summary class="tag">Show raw JSON</summary>
        <pre class="pre-scroll">{}</pre>
      </details>
    </div>{prompt_section}"#,
        session_url("", session, None),
        escape_html(&meta.session_id),
        escape_html(title),
        kv(
            "File",
            &meta
                .path
                .as_ref()
                .map(|path| mono(&path.display().to_string()))
                .unwrap_or_else(|| "-".into()),
        ),
        escape_html(pretty),
        escape_html(raw),
    )
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

pub fn jobs(jobs: &[JobSummary], session: &Path) -> String {
    if jobs.is_empty() {
        return r#"
    <div class="panel">
      <h2>Jobs</h2>
      <p class="notice">No jobs found in this session.</p>
    </div>"#
            .to_string();
    }

    let rows: String = jobs
        .iter()
        .map(|job| {
            let updated = format_utc(job.updated_at);
            format!(
                r#"
        <tr>
          <td><a href="{}">{}</a></td>
          <td>{}</td>
          <td>{}</td>
          <td class="mono">{}</td>
          <td class="mono">{}</td>
        </tr>"#,
                session_url("/job", session, Some(&job.id)),
                escape_html(&job.id),
                badge(&job.status),
                escape_html(or_dash(&job.job_type)),
                escape_html(or_dash(&updated)),
                escape_html(&job.summary),
            )
        })
        .collect();

    format!(
        r#"
    <div class="panel">
      <h2>Jobs</h2>
      <table class="table">
        <thead>
          <tr><th>ID</th><th>Status</th><th>Type</th><th>Updated</th><th>Summary</th></tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>
    </div>"#
    )
}

pub fn job_detail(detail: &JobDetail) -> String {
    let path = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".into())
    };
    let raw = |r: &Option<String>| {
        escape_html(
            r.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("(missing)"),
        )
    };

    format!(
        r#"
    <div class="panel">
      <h2>Job {}</h2>
      <div class="grid cols-2">{}{}{}{}</div>
      <div class="split">
        <div>
          <h3>Request JSON</h3>
          <pre>{}</pre>
        </div>
        <div>
          <h3>Response JSON</h3>
          <pre>{}</pre>
        </div>
      </div>
    </div>"#,
        escape_html(&detail.id),
        kv("Status", &badge(&detail.status)),
        kv("Type", &escape_html(or_dash(&detail.job_type))),
        kv("Request File", &mono(&path(&detail.request_path))),
        kv("Response File", &mono(&path(&detail.response_path))),
        raw(&detail.request_raw),
        raw(&detail.response_raw),
    )
}

/// Job page body: detail plus polled stream and log tails.
pub fn job_page(detail: &JobDetail, session: &Path) -> String {
    format!(
        r#"
      <a class="tag" href="{}">&larr; Back to session</a>
      {}
      {}
      {}"#,
        session_url("", session, None),
        job_detail(detail),
        poll(&session_url("/stream", session, Some(&detail.id)), "2s"),
        poll(&session_url("/logs", session, None), "5s"),
    )
}

pub fn logs(tail: Option<&str>) -> String {
    pre_panel("Bridge Log", tail, "(no logs)")
}

pub fn stream(tail: Option<&str>) -> String {
    pre_panel("Stream Output", tail, "(no stream)")
}

fn pre_panel(heading: &str, content: Option<&str>, placeholder: &str) -> String {
    let content = content.filter(|s| !s.is_empty()).unwrap_or(placeholder);
    format!(
        r#"
    <div class="panel">
      <h2>{heading}</h2>
      <pre>{}</pre>
    </div>"#,
        escape_html(content)
    )
}

pub fn request_form(session: &Path) -> String {
    let options: String = JOB_TYPES
        .iter()
        .map(|t| format!(r#"<option value="{t}">{t}</option>"#))
        .collect();
    format!(
        r#"
    <div class="panel">
      <h2>Create Request</h2>
      <form method="post" action="/session/job">
        <input type="hidden" name="path" value="{}" />
        <label>Type <select name="type">{options}</select></label>
        <label>Payload JSON (optional)
          <textarea name="payload" placeholder='{{"command": "ls -la", "timeout": 30}}'></textarea>
        </label>
        <label>Quick command / URL / prompt
          <input type="text" name="quick" placeholder="command, url, or prompt" />
        </label>
        <label>Timeout (seconds) <input type="number" name="timeout" min="1" /></label>
        <label>Working directory (cwd)
          <input type="text" name="cwd" placeholder="~/projects/my-app" />
        </label>
        <button type="submit">Create Request</button>
      </form>
      <p class="notice">If payload JSON is provided, it takes precedence. Otherwise the quick field maps to <code>command</code>, <code>url</code>, or <code>prompt</code> depending on type.</p>
    </div>"#,
        escape_html(&session.display().to_string())
    )
}

/// Session page body: four tabs, three of them polled.
pub fn session_page(session: &Path, tools_html: &str) -> String {
    let group = format!("session-{}", encode(&session.display().to_string()));
    format!(
        r#"
      <div class="tab-group" data-tab-group="{}">
        <div class="tabs">
          <button class="tab-button" data-tab="overview" type="button">Overview</button>
          <button class="tab-button" data-tab="tools" type="button">Tools</button>
          <button class="tab-button" data-tab="jobs" type="button">Jobs</button>
          <button class="tab-button" data-tab="logs" type="button">Logs</button>
        </div>
        <div class="tab-panels">
          <section class="tab-panel" data-tab-panel="overview">
            <div class="grid cols-2">{}{}</div>
          </section>
          <section class="tab-panel" data-tab-panel="tools">
            <div class="grid cols-2">{tools_html}</div>
          </section>
          <section class="tab-panel" data-tab-panel="jobs">{}</section>
          <section class="tab-panel" data-tab-panel="logs">{}</section>
        </div>
      </div>"#,
        escape_html(&group),
        poll(&session_url("/summary", session, None), "3s"),
        request_form(session),
        poll(&session_url("/jobs", session, None), "3s"),
        poll(&session_url("/logs", session, None), "5s"),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
