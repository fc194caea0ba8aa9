//! Per-session manifest describing how a shortened fixture was produced.
//!
//! The manifest is written as JSON next to the shortened tables so a fixture
//! can be traced back to its source files and parameters.

use crate::core::windowing::WindowSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// File name of the manifest inside a session directory.
pub const MANIFEST_FILE: &str = "short.manifest.json";

/// Shape of one table before and after shortening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Logical role of the table ("trajectories" or "trial_info")
    pub role: String,
    /// Source file name
    pub source: String,
    /// Output file name
    pub output: String,
    /// Rows in the source table
    pub source_rows: usize,
    /// Rows written to the output
    pub output_rows: usize,
    /// Number of data columns (excluding the row-index column)
    pub columns: usize,
}

/// Record of a single shortening run over one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the outputs were produced
    pub created_at: DateTime<Utc>,
    /// Version of the tool that produced them
    pub tool_version: String,
    /// Requested frame window
    pub window: WindowSpec,
    /// Gaussian width used for smoothing
    pub sigma: f64,
    /// Column that was smoothed
    pub angle_column: String,
    /// Whether the row-index column was written
    pub write_index: bool,
    /// One entry per table written
    pub tables: Vec<TableRecord>,
}

impl RunManifest {
    /// Start a manifest for the given parameters.
    pub fn new(window: WindowSpec, sigma: f64, angle_column: &str, write_index: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            tool_version: crate::VERSION.to_string(),
            window,
            sigma,
            angle_column: angle_column.to_string(),
            write_index,
            tables: Vec::new(),
        }
    }

    pub fn record_table(&mut self, record: TableRecord) {
        self.tables.push(record);
    }

    /// Total rows written across all tables.
    pub fn rows_written(&self) -> usize {
        self.tables.iter().map(|t| t.output_rows).sum()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a manifest from `path`.
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }
}
