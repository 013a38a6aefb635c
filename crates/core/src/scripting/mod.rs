//! Running maintenance scripts and system commands.
//!
//! The scripts themselves are external; this module only spawns them with a
//! timeout and captures exit code, stdout and stderr.

pub mod executor;
pub mod subprocess;

pub use executor::{CommandOutput, Invocation, ScriptError};
pub use subprocess::{run_command, strip_ansi};
