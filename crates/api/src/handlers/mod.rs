//! Request handlers.
//!
//! Each submodule serves one area of the dashboard. Handlers read the
//! bridge through `bridge_core` and render HTML via [`crate::views`].

pub mod actions;
pub mod global;
pub mod health;
pub mod jobs;
pub mod sessions;
