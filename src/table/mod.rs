//! Tabular frame data for tracking sessions.
//!
//! Provides the in-memory table type and the tab-separated file codec used
//! for `frames.*.htsv` files.

pub mod htsv;
pub mod types;

// Re-export commonly used types
pub use htsv::{parse_table, read_table, render_table, write_table};
pub use types::{Column, Table};
