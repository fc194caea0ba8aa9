//! htsv-shorten - small test fixtures from recorded tracking sessions.
//!
//! A tracking session stores per-frame trajectories and per-frame trial
//! information as two aligned tab-separated tables. This library cuts both
//! tables to the same frame window and smooths the head-direction channel of
//! the trajectory window with a circular Gaussian filter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        htsv-shorten                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │    Table    │──▶│  Windowing  │──▶│  Smoothing  │         │
//! │  │ (htsv read) │   │ (row range) │   │ (circular)  │         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                                             │                │
//! │                                             ▼                │
//! │                     ┌─────────────┐   ┌─────────────┐        │
//! │                     │ Provenance  │◀──│   Session   │        │
//! │                     │  Manifest   │   │   (write)   │        │
//! │                     └─────────────┘   └─────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use htsv_shorten::core::smooth;
//!
//! let smoothed = smooth(&[359.0, 1.0, 359.0, 1.0], 1.0).unwrap();
//! assert_eq!(smoothed.len(), 4);
//! assert!(smoothed.iter().all(|d| *d < 2.0 || *d > 358.0));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod provenance;
pub mod session;
pub mod table;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use self::core::{extract, smooth, GaussianKernel, WindowSpec};
pub use error::ShortenError;
pub use provenance::{RunLog, RunManifest};
pub use session::{shorten_session, shorten_tables, SessionOutcome, ShortenParams};
pub use table::{Column, Table};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
