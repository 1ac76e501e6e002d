//! Per-segment power spectrum estimation
//!
//! Combines the Hann window with the FFT engine. Output stays in linear power
//! so that spectra can be averaged before any dB conversion.

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, hann_window};
use num_complex::Complex64;

/// Windowed FFT power estimator for one FFT size
///
/// Holds its own window, FFT plan and buffers; one instance per worker.
pub struct SpectralEstimator {
    window: Vec<f64>,
    fft_engine: FftEngine,
    windowed: Vec<Complex64>,
}

impl SpectralEstimator {
    pub fn new(fft_size: usize) -> Self {
        Self {
            window: hann_window(fft_size),
            fft_engine: FftEngine::new(fft_size),
            windowed: vec![Complex64::new(0.0, 0.0); fft_size],
        }
    }

    /// Power spectrum of one segment, DC centered
    ///
    /// # Arguments
    /// * `segment` - Complex samples; zero-padded to fft_size if shorter
    ///
    /// # Returns
    /// |FFT(segment * hann)|^2 per bin, center-shifted
    pub fn estimate(&mut self, segment: &[Complex64]) -> Vec<f64> {
        let n = self.fft_size();
        let copy_len = segment.len().min(n);
        self.windowed[..copy_len].copy_from_slice(&segment[..copy_len]);
        self.windowed[copy_len..].fill(Complex64::new(0.0, 0.0));

        apply_window_inplace(&mut self.windowed, &self.window);

        self.fft_engine.compute_power_shifted(&self.windowed)
    }

    /// Add the segment's power spectrum into `accumulator` elementwise
    pub fn accumulate(&mut self, segment: &[Complex64], accumulator: &mut [f64]) {
        let power = self.estimate(segment);
        for (acc, p) in accumulator.iter_mut().zip(power) {
            *acc += p;
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_engine.fft_size()
    }

    pub fn window(&self) -> &[f64] {
        &self.window
    }
}
