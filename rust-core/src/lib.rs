//! IQ PSD - Averaged Spectrum Analysis for Multi-Channel I/Q Captures
//!
//! Streams interleaved 16-bit I/Q captures from disk, estimates Hann-windowed
//! power spectra per channel and averages them into dB curves. Python
//! bindings are available with the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod averaging;
pub mod config;
pub mod deframe;
pub mod error;
pub mod source;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use averaging::{analyze, AveragePlan, AveragingEngine, PsdReport, ResultCurve, SpectrumPoint};
pub use config::AnalysisConfig;
pub use deframe::{extract_channel, Segment};
pub use error::{ConfigError, PsdError};
pub use source::{FileSource, MemorySource, SampleSource};
pub use spectrum::SpectralEstimator;
