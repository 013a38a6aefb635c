//! Domain logic for the bridge dashboard.
//!
//! Everything here reads the file-backed job protocol shared with the
//! external agent: session discovery, job aggregation and status derivation,
//! job submission, and the maintenance action catalogue. There is no HTTP
//! in this crate.

pub mod actions;
pub mod aggregator;
pub mod bridge;
pub mod error;
pub mod job;
pub mod presets;
pub mod scan;
pub mod scripting;
pub mod services;
pub mod sessions;
pub mod submission;

pub use bridge::{BridgeDir, SessionResolver};
pub use error::CoreError;
