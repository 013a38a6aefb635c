//! Spawn a process, capture its output and enforce a timeout.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::executor::{CommandOutput, Invocation, ScriptError};

/// Maximum stdout or stderr size captured per stream (1 MiB).
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x1b\x{9b}][\[\]()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]")
        .expect("valid regex")
});

/// Remove terminal colour and cursor escape sequences.
pub fn strip_ansi(value: &str) -> String {
    ANSI_RE.replace_all(value, "").into_owned()
}

/// Run `invocation` to completion.
///
/// A non-zero exit is a normal [`CommandOutput`]; only spawn failures and
/// timeouts are errors. The child is killed when the timeout fires.
pub async fn run_command(invocation: &Invocation) -> Result<CommandOutput, ScriptError> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => {
            ScriptError::NotFound(invocation.program.display().to_string())
        }
        _ => ScriptError::Io(err),
    })?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    match tokio::time::timeout(invocation.timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();
            Ok(CommandOutput {
                stdout: strip_ansi(&String::from_utf8_lossy(&stdout_bytes)),
                stderr: strip_ansi(&String::from_utf8_lossy(&stderr_bytes)),
                exit_code: status.code().unwrap_or(-1),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(err)) => Err(ScriptError::Io(err)),
        Err(_elapsed) => Err(ScriptError::Timeout {
            elapsed_ms: start.elapsed().as_millis() as u64,
        }),
    }
}

async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.take(MAX_OUTPUT_BYTES).read_to_end(&mut buf).await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    fn sh(script: &str, timeout: Duration) -> Invocation {
        Invocation::new("sh", vec!["-c".into(), script.into()], timeout)
    }

    #[test]
    fn strips_colour_codes() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip_ansi("no escapes"), "no escapes");
    }

    #[tokio::test]
    async fn captures_stdout_stderr_and_exit_code() {
        let output = run_command(&sh("echo out; echo err >&2; exit 3", Duration::from_secs(5)))
            .await
            .expect("run");
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, 3);
    }

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let invocation = Invocation::new("/nonexistent/script.sh", vec![], Duration::from_secs(1));
        assert_matches!(run_command(&invocation).await, Err(ScriptError::NotFound(_)));
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let result = run_command(&sh("sleep 5", Duration::from_millis(100))).await;
        assert_matches!(result, Err(ScriptError::Timeout { .. }));
    }
}
