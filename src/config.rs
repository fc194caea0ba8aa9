//! Configuration for htsv-shorten.

use crate::core::smoothing::{validate_sigma, DEFAULT_SIGMA};
use crate::core::windowing::{WindowSpec, DEFAULT_N_FRAMES, DEFAULT_START_FRAME};
use crate::error::ShortenError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Name of the angular column smoothed by default.
pub const DEFAULT_ANGLE_COLUMN: &str = "head_direction.value";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First frame of the extracted window
    pub start_frame: usize,

    /// Number of frames in the extracted window
    pub n_frames: usize,

    /// Gaussian width (in frames) used for circular smoothing
    pub sigma: f64,

    /// Trajectory column holding the heading in degrees
    pub angle_column: String,

    /// Whether to write the source row position as a leading column
    pub write_index: bool,

    /// Whether to write a JSON manifest next to the outputs
    pub write_manifest: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_frame: DEFAULT_START_FRAME,
            n_frames: DEFAULT_N_FRAMES,
            sigma: DEFAULT_SIGMA,
            angle_column: DEFAULT_ANGLE_COLUMN.to_string(),
            write_index: true,
            write_manifest: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The file a command reads and writes: `explicit` when given, else the
    /// default location.
    pub fn resolve_path(explicit: Option<&std::path::Path>) -> PathBuf {
        explicit.map_or_else(Self::config_path, std::path::Path::to_path_buf)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("htsv-shorten")
            .join("config.json")
    }

    /// Check the numeric parameters and build the frame window.
    pub fn validate(&self) -> Result<WindowSpec, ShortenError> {
        validate_sigma(self.sigma)?;
        if self.angle_column.is_empty() {
            return Err(ShortenError::invalid_parameter(
                "angle_column",
                "column name must not be empty",
            ));
        }
        WindowSpec::new(self.start_frame, self.n_frames)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
