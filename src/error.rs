//! Error types shared by the table, windowing and smoothing code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while shortening a session.
#[derive(Debug, Error)]
pub enum ShortenError {
    /// A numeric parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A source file is absent.
    #[error("missing input file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A required column is absent from a table.
    #[error("missing column `{column}` in {table}")]
    MissingColumn { table: String, column: String },

    /// The file does not follow the header + rows layout.
    #[error("malformed table {table} at line {line}: {reason}")]
    Malformed {
        table: String,
        line: usize,
        reason: String,
    },

    /// An angular cell does not hold a finite number.
    #[error("invalid value {value:?} in column `{column}` at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShortenError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ShortenError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShortenError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means an input was not found (file or column).
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ShortenError::MissingFile { .. } | ShortenError::MissingColumn { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShortenError>;
