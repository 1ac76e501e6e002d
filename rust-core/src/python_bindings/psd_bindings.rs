//! Python bindings for averaged capture analysis

use crate::averaging::{AveragingEngine, PsdReport};
use crate::config::AnalysisConfig;
use crate::error::PsdError;
use crate::source::FileSource;
use numpy::PyArray1;
use pyo3::exceptions::{PyIndexError, PyInterruptedError, PyOSError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

impl From<PsdError> for PyErr {
    fn from(err: PsdError) -> Self {
        match err {
            PsdError::Io(e) => PyOSError::new_err(e.to_string()),
            PsdError::Cancelled => PyInterruptedError::new_err(err.to_string()),
            PsdError::Configuration(_) | PsdError::InsufficientData { .. } => {
                PyValueError::new_err(err.to_string())
            }
        }
    }
}

/// Averaged spectra of every channel in a capture
#[pyclass(name = "PsdReport")]
pub struct PyPsdReport {
    report: PsdReport,
}

#[pymethods]
impl PyPsdReport {
    /// Number of segments actually averaged
    #[getter]
    fn actual_averages(&self) -> usize {
        self.report.plan.actual_averages
    }

    /// Number of segments that were asked for
    #[getter]
    fn requested_averages(&self) -> usize {
        self.report.plan.requested_averages
    }

    /// True when the capture was too short for the requested averages
    #[getter]
    fn clamped(&self) -> bool {
        self.report.plan.is_clamped()
    }

    #[getter]
    fn channel_count(&self) -> usize {
        self.report.curves.len()
    }

    /// Get the shared frequency axis in MHz
    ///
    /// Returns:
    ///     Frequencies as numpy array, DC at index fft_size/2
    fn frequencies_mhz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.report.frequencies_mhz)
    }

    /// Get one channel's averaged power in dB
    ///
    /// Args:
    ///     channel: Channel index
    ///
    /// Returns:
    ///     Power in dB as numpy array, aligned with frequencies_mhz()
    fn power_db<'py>(&self, py: Python<'py>, channel: usize) -> PyResult<&'py PyArray1<f64>> {
        let curve = self
            .report
            .curve(channel)
            .ok_or_else(|| PyIndexError::new_err(format!("no channel {}", channel)))?;

        Ok(PyArray1::from_vec(py, curve.power_db()))
    }

    /// Plot caption, e.g. "Averaged Spectrum (50 segments)"
    fn title(&self) -> String {
        self.report.title()
    }
}

/// Analyze a raw interleaved int16 I/Q capture
///
/// Args:
///     path: Capture file path
///     channel_count: Number of interleaved channels
///     sample_rate_hz: Per-channel sample rate in Hz
///     fft_size: Segment length (should be power of 2)
///     requested_averages: Segments to average (clamped to the capture length)
///
/// Returns:
///     PsdReport
#[pyfunction]
#[pyo3(signature = (path, channel_count=8, sample_rate_hz=250e6, fft_size=2048, requested_averages=50))]
pub fn analyze_capture(
    py: Python<'_>,
    path: PathBuf,
    channel_count: usize,
    sample_rate_hz: f64,
    fft_size: usize,
    requested_averages: usize,
) -> PyResult<PyPsdReport> {
    let config = AnalysisConfig {
        channel_count,
        sample_rate_hz,
        fft_size,
        requested_averages,
    };

    let report = py.allow_threads(move || -> Result<PsdReport, PsdError> {
        let engine = AveragingEngine::new(config)?;
        let source = FileSource::open(&path)?;
        engine.analyze(&source)
    })?;

    Ok(PyPsdReport { report })
}
