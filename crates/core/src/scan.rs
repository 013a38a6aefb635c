//! Absence-tolerant file system readers.
//!
//! Every reader here treats a missing or unreadable path as a normal state
//! and reports it as `None` (or an empty list), never as an error. A bridge
//! directory may not exist yet, and the dashboard should show "nothing yet"
//! rather than fail.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use serde_json::Value;

/// List the entry names of `dir`, or an empty list if it cannot be read.
///
/// Order is whatever the platform returns.
pub async fn list_dir(dir: &Path) -> Vec<String> {
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return Vec::new();
    };

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names
}

/// List the stems of entries in `dir` ending in `.{extension}`.
///
/// `requests/job-1.json` yields `job-1` for extension `json`.
pub async fn list_stems(dir: &Path, extension: &str) -> Vec<String> {
    let suffix = format!(".{extension}");
    list_dir(dir)
        .await
        .into_iter()
        .filter_map(|name| name.strip_suffix(&suffix).map(str::to_string))
        .filter(|stem| !stem.is_empty())
        .collect()
}

/// Stat `path`, or `None` if it does not exist or cannot be read.
pub async fn stat(path: &Path) -> Option<Metadata> {
    tokio::fs::metadata(path).await.ok()
}

/// Whether anything exists at `path`.
pub async fn exists(path: &Path) -> bool {
    stat(path).await.is_some()
}

/// Modification time of `path`, if it can be determined.
pub async fn modified(path: &Path) -> Option<SystemTime> {
    stat(path).await.and_then(|meta| meta.modified().ok())
}

/// Read `path` as UTF-8 text.
///
/// `None` means the file is absent or unreadable; `Some("")` means it exists
/// and is empty. Callers rely on that distinction.
pub async fn read_text(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

/// Read and parse `path` as JSON, or `None` on any failure.
pub async fn read_json(path: &Path) -> Option<Value> {
    let raw = read_text(path).await?;
    serde_json::from_str(&raw).ok()
}

/// Return the last `lines` lines of `path`.
///
/// `None` when the file is absent, mirroring [`read_text`].
pub async fn tail(path: &Path, lines: usize) -> Option<String> {
    let content = read_text(path).await?;
    Some(tail_lines(&content, lines))
}

/// Keep the last `lines` lines of `content`, splitting on `\n` or `\r\n`.
pub fn tail_lines(content: &str, lines: usize) -> String {
    let all: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Newest modification time across all entries of `dirs`.
pub async fn newest_mtime(dirs: &[&Path]) -> Option<SystemTime> {
    let mut latest: Option<SystemTime> = None;
    for dir in dirs {
        for name in list_dir(dir).await {
            let Some(mtime) = modified(&dir.join(&name)).await else {
                continue;
            };
            if latest.map_or(true, |current| mtime > current) {
                latest = Some(mtime);
            }
        }
    }
    latest
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
