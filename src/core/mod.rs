//! Core algorithms for shortening tracking sessions.
//!
//! This module contains:
//! - Frame window extraction over aligned tables
//! - Circular Gaussian smoothing for angular channels

pub mod smoothing;
pub mod windowing;

// Re-export commonly used types
pub use smoothing::{smooth, smooth_with_kernel, GaussianKernel, DEFAULT_SIGMA};
pub use windowing::{extract, WindowSpec, DEFAULT_N_FRAMES, DEFAULT_START_FRAME};
