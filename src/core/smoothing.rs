//! Circular Gaussian smoothing for angular channels.
//!
//! Angles are mapped onto the unit circle, the sine and cosine components are
//! smoothed independently with a periodic Gaussian convolution, and the result
//! is mapped back with `atan2`. Averaging raw degrees would put the midpoint of
//! 359° and 1° at 180°; averaging the components puts it at 0°.

use crate::error::{Result, ShortenError};
use statrs::distribution::{Continuous, Normal};
use tracing::debug;

/// Kernel half-width in units of sigma.
pub const TRUNCATE: f64 = 4.0;

/// Default smoothing width in samples.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Largest kernel half-width that will be materialized.
pub const MAX_RADIUS: usize = 1_000_000;

/// A normalized, truncated 1D Gaussian kernel.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    sigma: f64,
    radius: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build a kernel covering `[-r, r]` with `r = floor(TRUNCATE * sigma + 0.5)`.
    pub fn new(sigma: f64) -> Result<Self> {
        validate_sigma(sigma)?;
        let radius = kernel_radius(sigma)?;

        let normal = Normal::new(0.0, sigma)
            .map_err(|e| ShortenError::invalid_parameter("sigma", format!("{e:?}")))?;

        let mut weights: Vec<f64> = (0..=2 * radius)
            .map(|k| normal.pdf(k as f64 - radius as f64))
            .collect();

        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }

        Ok(Self {
            sigma,
            radius,
            weights,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Weights for offsets `-radius..=radius`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Convolve a series treated as periodic.
    ///
    /// Neighbour indices wrap modulo the series length, as many times as
    /// needed when the kernel is longer than the series.
    pub fn convolve_circular(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        if n == 0 {
            return Vec::new();
        }

        let taps = self.taps(n);
        (0..n)
            .map(|i| {
                taps.iter()
                    .map(|(shift, w)| w * series[(i + shift) % n])
                    .sum::<f64>()
            })
            .collect()
    }

    /// Weights keyed by forward shift modulo `n`.
    ///
    /// A kernel longer than the series is folded onto `n` taps, so the cost
    /// of a convolution never exceeds `n` taps per sample.
    fn taps(&self, n: usize) -> Vec<(usize, f64)> {
        let radius = self.radius as isize;
        let shift = |k: usize| (k as isize - radius).rem_euclid(n as isize) as usize;

        if self.weights.len() <= n {
            return self
                .weights
                .iter()
                .enumerate()
                .map(|(k, w)| (shift(k), *w))
                .collect();
        }

        let mut folded = vec![0.0; n];
        for (k, w) in self.weights.iter().enumerate() {
            folded[shift(k)] += w;
        }
        folded.into_iter().enumerate().collect()
    }
}

/// Half-width `floor(TRUNCATE * sigma + 0.5)`, bounded by [`MAX_RADIUS`].
fn kernel_radius(sigma: f64) -> Result<usize> {
    let reach = (TRUNCATE * sigma + 0.5).floor();
    if !reach.is_finite() || reach > MAX_RADIUS as f64 {
        return Err(ShortenError::invalid_parameter(
            "sigma",
            format!("kernel radius {reach} exceeds {MAX_RADIUS} samples (sigma = {sigma})"),
        ));
    }
    Ok(reach as usize)
}

/// Smooth a series of angles in degrees.
///
/// The output has the same length as the input and every value lies in
/// `[0, 360)`. Inputs outside that range are accepted.
pub fn smooth(angles: &[f64], sigma: f64) -> Result<Vec<f64>> {
    let kernel = GaussianKernel::new(sigma)?;
    smooth_with_kernel(angles, &kernel)
}

/// Smooth a series of angles with a prebuilt kernel.
pub fn smooth_with_kernel(angles: &[f64], kernel: &GaussianKernel) -> Result<Vec<f64>> {
    if let Some((row, value)) = angles.iter().enumerate().find(|(_, a)| !a.is_finite()) {
        return Err(ShortenError::InvalidValue {
            column: "angle".to_string(),
            row,
            value: value.to_string(),
        });
    }

    let (sin, cos): (Vec<f64>, Vec<f64>) = angles
        .iter()
        .map(|deg| deg.to_radians().sin_cos())
        .unzip();

    let sin_smooth = kernel.convolve_circular(&sin);
    let cos_smooth = kernel.convolve_circular(&cos);

    debug!(
        samples = angles.len(),
        sigma = kernel.sigma(),
        radius = kernel.radius(),
        "smoothed angular series"
    );

    Ok(sin_smooth
        .iter()
        .zip(&cos_smooth)
        .map(|(s, c)| normalize_degrees(s.atan2(*c).to_degrees()))
        .collect())
}

/// Map an angle from `(-360, 360)` into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 360.0) % 360.0;
    if wrapped >= 360.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Reject widths the Gaussian is not defined for.
pub fn validate_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ShortenError::invalid_parameter(
            "sigma",
            format!("must be a finite number greater than 0, got {sigma}"),
        ));
    }
    Ok(())
}
