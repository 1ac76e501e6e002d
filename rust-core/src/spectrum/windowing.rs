//! Windowing for spectral analysis
//!
//! Applies a Hann taper to complex segments before the FFT to reduce
//! spectral leakage

use num_complex::Complex64;
use std::f64::consts::PI;

/// Generate a symmetric Hann window
///
/// w[n] = 0.5 - 0.5*cos(2πn/(M-1)) for n = 0..M-1. Endpoints are zero and
/// the peak of 1.0 sits at the center for odd M.
pub fn hann_window(length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            0.5 - 0.5 * angle.cos()
        })
        .collect()
}

/// Apply window to a complex segment
///
/// # Arguments
/// * `segment` - Complex time-domain samples
/// * `window` - Real window coefficients (same length as `segment`)
pub fn apply_window(segment: &[Complex64], window: &[f64]) -> Vec<Complex64> {
    segment
        .iter()
        .zip(window.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}

/// Apply window in-place
pub fn apply_window_inplace(segment: &mut [Complex64], window: &[f64]) {
    for (s, &w) in segment.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}
