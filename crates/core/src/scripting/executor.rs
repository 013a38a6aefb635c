//! Shared types for subprocess execution.

use std::path::PathBuf;
use std::time::Duration;

/// A program to run with its arguments and wall-clock limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Stdout with ANSI escapes removed.
    pub stdout: String,
    /// Stderr with ANSI escapes removed.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Output describing a failure that happened before or instead of a
    /// normal exit.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: 1,
            duration_ms: 0,
        }
    }
}

/// Errors that prevent a normal exit status from being observed.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScriptError> for CommandOutput {
    fn from(err: ScriptError) -> Self {
        CommandOutput::failed(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_timeout() {
        let err = ScriptError::Timeout { elapsed_ms: 5000 };
        assert_eq!(err.to_string(), "Command timed out after 5000ms");
    }

    #[test]
    fn error_converts_to_failed_output() {
        let output = CommandOutput::from(ScriptError::NotFound("/x.sh".into()));
        assert_eq!(output.exit_code, 1);
        assert_eq!(output.stderr, "Command not found: /x.sh");
        assert!(!output.success());
    }
}
