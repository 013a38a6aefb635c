//! Status of the auto-setup daemon and the bridge watcher process.

use std::path::Path;
use std::time::Duration;

use crate::actions::DAEMON_LABEL;
use crate::scan;
use crate::scripting::{run_command, CommandOutput, Invocation};

/// Pattern the watcher process is matched by.
const WATCHER_PATTERN: &str = "cli-bridge/watcher.sh";

const STATUS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    Loaded,
    Unloaded,
    Missing,
    Error,
}

impl DaemonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Unloaded => "unloaded",
            Self::Missing => "missing",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherStatus {
    pub running: bool,
    /// Newline-separated pids as printed by `pgrep`.
    pub pids: String,
}

impl WatcherStatus {
    pub fn as_str(&self) -> &'static str {
        if self.running {
            "running"
        } else {
            "stopped"
        }
    }
}

/// Daemon state: no plist is `missing`, a failed `launchctl list` is
/// `error`, otherwise whether the label is listed.
pub async fn daemon_status(plist: &Path) -> DaemonStatus {
    if !scan::exists(plist).await {
        return DaemonStatus::Missing;
    }
    let list = Invocation::new("launchctl", vec!["list".into()], STATUS_TIMEOUT);
    let output = run_command(&list).await.unwrap_or_else(CommandOutput::from);
    daemon_status_from_listing(&output)
}

fn daemon_status_from_listing(output: &CommandOutput) -> DaemonStatus {
    if !output.success() {
        return DaemonStatus::Error;
    }
    if output.stdout.lines().any(|line| line.contains(DAEMON_LABEL)) {
        DaemonStatus::Loaded
    } else {
        DaemonStatus::Unloaded
    }
}

pub async fn watcher_status() -> WatcherStatus {
    let pgrep = Invocation::new(
        "pgrep",
        vec!["-f".into(), WATCHER_PATTERN.into()],
        STATUS_TIMEOUT,
    );
    let output = run_command(&pgrep).await.unwrap_or_else(CommandOutput::from);
    watcher_status_from_pgrep(&output)
}

fn watcher_status_from_pgrep(output: &CommandOutput) -> WatcherStatus {
    let pids = if output.success() {
        output.stdout.trim().to_string()
    } else {
        String::new()
    };
    WatcherStatus {
        running: !pids.is_empty(),
        pids,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
