//! FFT engine using rustfft for complex (I/Q) signals
//!
//! Produces center-shifted power spectra: DC sits at index `fft_size/2`

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for complex-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Forward FFT processor
    fft: Arc<dyn Fft<f64>>,

    /// Reusable in-place buffer
    buffer: Vec<Complex64>,

    /// Scratch space required by the planned algorithm
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of complex samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let buffer = vec![Complex64::new(0.0, 0.0); fft_size];
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            buffer,
            scratch,
        }
    }

    /// Compute the unnormalized forward DFT
    ///
    /// # Arguments
    /// * `signal` - Input signal (zero-padded if shorter than fft_size, truncated if longer)
    ///
    /// # Returns
    /// Spectrum X[k] in natural (unshifted) bin order
    pub fn compute(&mut self, signal: &[Complex64]) -> &[Complex64] {
        let copy_len = signal.len().min(self.fft_size);
        self.buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        if copy_len < self.fft_size {
            self.buffer[copy_len..].fill(Complex64::new(0.0, 0.0));
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        &self.buffer
    }

    /// Compute power spectrum |X[k]|^2 with DC moved to the center
    pub fn compute_power_shifted(&mut self, signal: &[Complex64]) -> Vec<f64> {
        let mut power: Vec<f64> = self.compute(signal).iter().map(|c| c.norm_sqr()).collect();
        fft_shift(&mut power);
        power
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Rotate a spectrum so bin 0 (DC) lands at index `len/2`
///
/// For even lengths this swaps the two halves; for odd lengths the extra
/// negative-frequency bin ends up first, so the result is ordered from most
/// negative to most positive frequency either way.
pub fn fft_shift<T>(data: &mut [T]) {
    let half = data.len() / 2;
    data.rotate_right(half);
}
