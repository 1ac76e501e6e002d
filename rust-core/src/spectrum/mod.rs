//! Spectral estimation with a Hann-windowed complex FFT

pub mod estimator;
pub mod fft;
pub mod frequency;
pub mod windowing;

pub use estimator::SpectralEstimator;
pub use fft::{fft_shift, FftEngine};
pub use frequency::build_axis;
pub use windowing::hann_window;
