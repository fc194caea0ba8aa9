//! Provenance records for shortened fixtures.
//!
//! Tracks what each run read and wrote, both per session (the JSON manifest)
//! and across a batch of sessions (the run log).

pub mod log;
pub mod manifest;

// Re-export commonly used types
pub use log::{RunLog, RunStats};
pub use manifest::{RunManifest, TableRecord, MANIFEST_FILE};
