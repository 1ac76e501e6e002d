//! Averaged power spectral density over a multi-channel capture
//!
//! For every channel the engine walks segment indices `0..actual_averages`,
//! deframes each segment, estimates its power spectrum and sums it into a
//! per-channel accumulator. The mean is converted to dB once at the end so
//! averaging stays linear in power.

use crate::config::AnalysisConfig;
use crate::deframe::extract_channel;
use crate::error::{PsdError, Result};
use crate::source::SampleSource;
use crate::spectrum::frequency::build_axis;
use crate::spectrum::SpectralEstimator;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Added to averaged power before the logarithm so empty bins stay finite
pub const DB_FLOOR_EPSILON: f64 = 1e-12;

/// Convert linear power to dB with the epsilon floor
pub fn power_to_db(power: f64) -> f64 {
    10.0 * (power + DB_FLOOR_EPSILON).log10()
}

/// How many segments will be averaged, decided once for all channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AveragePlan {
    pub requested_averages: usize,
    pub actual_averages: usize,

    /// Complex samples available to every channel
    pub samples_per_channel: u64,
}

impl AveragePlan {
    /// Size the averaging run from the capture length
    ///
    /// Fails with `InsufficientData` when not even one full segment fits.
    pub fn for_source<S: SampleSource + ?Sized>(
        source: &S,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let samples_per_channel = source.samples_per_channel(config.channel_count);
        let available = samples_per_channel / config.fft_size as u64;
        let actual_averages = (config.requested_averages as u64).min(available) as usize;

        if actual_averages == 0 {
            return Err(PsdError::InsufficientData {
                samples_per_channel,
                fft_size: config.fft_size,
            });
        }

        let plan = Self {
            requested_averages: config.requested_averages,
            actual_averages,
            samples_per_channel,
        };

        if plan.is_clamped() {
            log::warn!(
                "capture only has {} samples per channel; reducing averages from {} to {}",
                samples_per_channel,
                plan.requested_averages,
                plan.actual_averages
            );
        }

        Ok(plan)
    }

    /// True when the capture could not supply every requested segment
    pub fn is_clamped(&self) -> bool {
        self.actual_averages < self.requested_averages
    }
}

/// One (frequency, power) pair of a result curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    pub frequency_mhz: f64,
    pub power_db: f64,
}

/// Averaged spectrum of one channel, ordered by frequency
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCurve {
    pub channel: usize,
    pub points: Vec<SpectrumPoint>,
}

impl ResultCurve {
    fn from_average(channel: usize, axis: &[f64], average: &[f64]) -> Self {
        let points = axis
            .iter()
            .zip(average.iter())
            .map(|(&frequency_mhz, &power)| SpectrumPoint {
                frequency_mhz,
                power_db: power_to_db(power),
            })
            .collect();

        Self { channel, points }
    }

    pub fn power_db(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.power_db).collect()
    }

    /// Point with the highest power
    pub fn peak(&self) -> Option<SpectrumPoint> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.power_db.total_cmp(&b.power_db))
    }
}

/// Output of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct PsdReport {
    pub plan: AveragePlan,

    /// Shared frequency axis in MHz, DC at index `fft_size/2`
    pub frequencies_mhz: Vec<f64>,

    /// One curve per channel, indexed by channel number
    pub curves: Vec<ResultCurve>,
}

impl PsdReport {
    pub fn actual_averages(&self) -> usize {
        self.plan.actual_averages
    }

    pub fn curve(&self, channel: usize) -> Option<&ResultCurve> {
        self.curves.get(channel)
    }

    /// Caption for a plot of this report
    pub fn title(&self) -> String {
        format!("Averaged Spectrum ({} segments)", self.plan.actual_averages)
    }
}

/// Incoherent spectrum averager
///
/// Stateless between calls: every `analyze` starts from fresh accumulators.
#[derive(Debug, Clone)]
pub struct AveragingEngine {
    config: AnalysisConfig,
    parallel: bool,
}

impl AveragingEngine {
    /// Create an engine, rejecting invalid configuration up front
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parallel: true,
        })
    }

    /// Process channels one after another instead of on the rayon pool
    ///
    /// Results are identical either way; each channel always sums its
    /// segments in index order.
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.parallel = !sequential;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Average every channel of `source`
    pub fn analyze<S: SampleSource + Sync + ?Sized>(&self, source: &S) -> Result<PsdReport> {
        self.run(source, None)
    }

    /// Like `analyze`, but gives up with `Cancelled` once `cancel` is set
    ///
    /// The flag is polled between segments.
    pub fn analyze_with_cancel<S: SampleSource + Sync + ?Sized>(
        &self,
        source: &S,
        cancel: &AtomicBool,
    ) -> Result<PsdReport> {
        self.run(source, Some(cancel))
    }

    fn run<S: SampleSource + Sync + ?Sized>(
        &self,
        source: &S,
        cancel: Option<&AtomicBool>,
    ) -> Result<PsdReport> {
        let plan = AveragePlan::for_source(source, &self.config)?;
        let frequencies_mhz = build_axis(self.config.fft_size, self.config.sample_rate_hz);

        log::debug!(
            "averaging {} segments of {} samples over {} channels",
            plan.actual_averages,
            self.config.fft_size,
            self.config.channel_count
        );

        let channels = 0..self.config.channel_count;
        let averages: Vec<Vec<f64>> = if self.parallel {
            channels
                .into_par_iter()
                .map(|channel| self.average_channel(source, channel, &plan, cancel))
                .collect::<Result<_>>()?
        } else {
            channels
                .map(|channel| self.average_channel(source, channel, &plan, cancel))
                .collect::<Result<_>>()?
        };

        let curves = averages
            .iter()
            .enumerate()
            .map(|(channel, average)| ResultCurve::from_average(channel, &frequencies_mhz, average))
            .collect();

        Ok(PsdReport {
            plan,
            frequencies_mhz,
            curves,
        })
    }

    /// Mean linear power spectrum of one channel
    pub fn average_channel<S: SampleSource + ?Sized>(
        &self,
        source: &S,
        channel: usize,
        plan: &AveragePlan,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<f64>> {
        let mut estimator = SpectralEstimator::new(self.config.fft_size);
        let mut accumulator = vec![0.0; self.config.fft_size];

        for segment_index in 0..plan.actual_averages {
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                return Err(PsdError::Cancelled);
            }
            let segment = extract_channel(source, channel, segment_index, &self.config)?;
            estimator.accumulate(&segment.samples, &mut accumulator);
        }

        let count = plan.actual_averages as f64;
        for value in accumulator.iter_mut() {
            *value /= count;
        }

        log::debug!("channel {} averaged", channel);
        Ok(accumulator)
    }
}

/// Validate `config` and average every channel of `source`
pub fn analyze<S: SampleSource + Sync + ?Sized>(
    source: &S,
    config: &AnalysisConfig,
) -> Result<PsdReport> {
    AveragingEngine::new(config.clone())?.analyze(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::source::MemorySource;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn config(channel_count: usize, fft_size: usize, requested_averages: usize) -> AnalysisConfig {
        AnalysisConfig {
            channel_count,
            sample_rate_hz: 1e6,
            fft_size,
            requested_averages,
        }
    }

    /// Capture with `frames` time samples; `iq(channel, t)` gives each pair
    fn capture(channel_count: usize, frames: usize, iq: impl Fn(usize, usize) -> (i16, i16)) -> MemorySource {
        let mut raw = Vec::with_capacity(frames * channel_count * 2);
        for t in 0..frames {
            for ch in 0..channel_count {
                let (i, q) = iq(ch, t);
                raw.push(i);
                raw.push(q);
            }
        }
        MemorySource::new(raw)
    }

    fn constant_pattern(ch: usize, _t: usize) -> (i16, i16) {
        match ch {
            0 => (100, -50),
            1 => (0, 300),
            _ => (-7, 7),
        }
    }

    #[test]
    fn test_identical_segments_average_to_single_spectrum() {
        let fft_size = 64;
        let n = 4;
        let cfg = config(3, fft_size, n);
        let source = capture(3, fft_size * n, constant_pattern);

        let report = analyze(&source, &cfg).unwrap();
        assert_eq!(report.actual_averages(), n);
        assert!(!report.plan.is_clamped());
        assert_eq!(report.curves.len(), 3);

        let mut estimator = SpectralEstimator::new(fft_size);
        for ch in 0..3 {
            let (i, q) = constant_pattern(ch, 0);
            let segment = vec![Complex64::new(i as f64, q as f64); fft_size];
            let single: Vec<f64> = estimator.estimate(&segment).into_iter().map(power_to_db).collect();

            let curve = report.curve(ch).unwrap();
            assert_eq!(curve.channel, ch);
            for (got, want) in curve.power_db().iter().zip(single.iter()) {
                assert!((got - want).abs() < 1e-9, "ch{}: {} vs {}", ch, got, want);
            }
        }
    }

    #[test]
    fn test_clamps_requested_averages() {
        let fft_size = 32;
        let cfg = config(2, fft_size, 50);
        let source = capture(2, fft_size * 3, constant_pattern);

        let plan = AveragePlan::for_source(&source, &cfg).unwrap();
        assert_eq!(plan.actual_averages, 3);
        assert_eq!(plan.requested_averages, 50);
        assert_eq!(plan.samples_per_channel, 96);
        assert!(plan.is_clamped());

        let report = analyze(&source, &cfg).unwrap();
        assert_eq!(report.actual_averages(), 3);
        assert!(report.plan.is_clamped());
        assert_eq!(report.title(), "Averaged Spectrum (3 segments)");
    }

    #[test]
    fn test_partial_trailing_segment_is_not_counted() {
        let fft_size = 32;
        let cfg = config(2, fft_size, 10);
        // Three full segments plus half of a fourth
        let source = capture(2, fft_size * 3 + fft_size / 2, constant_pattern);

        let plan = AveragePlan::for_source(&source, &cfg).unwrap();
        assert_eq!(plan.actual_averages, 3);
    }

    #[test]
    fn test_fewer_requested_than_available() {
        let cfg = config(1, 16, 2);
        let source = capture(1, 16 * 5, constant_pattern);

        let plan = AveragePlan::for_source(&source, &cfg).unwrap();
        assert_eq!(plan.actual_averages, 2);
        assert!(!plan.is_clamped());
    }

    #[test]
    fn test_insufficient_data() {
        let fft_size = 64;
        let cfg = config(2, fft_size, 5);
        let source = capture(2, fft_size - 1, constant_pattern);

        match analyze(&source, &cfg) {
            Err(PsdError::InsufficientData {
                samples_per_channel,
                fft_size: needed,
            }) => {
                assert_eq!(samples_per_channel, 63);
                assert_eq!(needed, 64);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }

        let empty = MemorySource::new(Vec::new());
        assert!(matches!(
            analyze(&empty, &cfg),
            Err(PsdError::InsufficientData { samples_per_channel: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_reading() {
        let source = capture(1, 64, constant_pattern);
        let cfg = config(0, 64, 1);
        assert!(matches!(
            analyze(&source, &cfg),
            Err(PsdError::Configuration(ConfigError::ZeroChannels))
        ));
    }

    #[test]
    fn test_silent_channel_hits_db_floor() {
        let fft_size = 128;
        let cfg = config(2, fft_size, 4);
        let source = capture(2, fft_size * 4, |ch, t| {
            if ch == 0 {
                (0, 0)
            } else {
                let phase = 2.0 * PI * 8.0 * t as f64 / fft_size as f64;
                ((2000.0 * phase.cos()) as i16, (2000.0 * phase.sin()) as i16)
            }
        });

        let report = analyze(&source, &cfg).unwrap();
        let floor = 10.0 * DB_FLOOR_EPSILON.log10();
        assert!((floor + 120.0).abs() < 1e-9);

        for p in &report.curve(0).unwrap().points {
            assert_eq!(p.power_db, floor);
            assert!(p.power_db.is_finite());
        }

        let peak = report.curve(1).unwrap().peak().unwrap();
        let expected_mhz = 8.0 * 1e6 / fft_size as f64 / 1e6;
        assert!((peak.frequency_mhz - expected_mhz).abs() < 1e-9);
        assert!(peak.power_db > 100.0);
    }

    #[test]
    fn test_curves_share_frequency_axis() {
        let fft_size = 64;
        let mut cfg = config(2, fft_size, 1);
        cfg.sample_rate_hz = 250e6;
        let source = capture(2, fft_size, constant_pattern);

        let report = analyze(&source, &cfg).unwrap();
        assert_eq!(report.frequencies_mhz, build_axis(fft_size, 250e6));
        for curve in &report.curves {
            assert_eq!(curve.points.len(), fft_size);
            for (point, &f) in curve.points.iter().zip(report.frequencies_mhz.iter()) {
                assert_eq!(point.frequency_mhz, f);
            }
        }
    }

    #[test]
    fn test_repeat_runs_are_bit_identical() {
        let fft_size = 256;
        let cfg = config(4, fft_size, 6);
        let source = capture(4, fft_size * 6 + 17, |ch, t| {
            let x = ((t * 31 + ch * 17) % 211) as i16 - 105;
            (x, x.wrapping_mul(3))
        });

        let engine = AveragingEngine::new(cfg).unwrap();
        let first = engine.analyze(&source).unwrap();
        let second = engine.analyze(&source).unwrap();
        assert_eq!(first, second);

        let sequential = engine.clone().sequential(true).analyze(&source).unwrap();
        assert_eq!(first, sequential);
    }

    #[test]
    fn test_cancelled_run() {
        let cfg = config(2, 32, 4);
        let source = capture(2, 32 * 4, constant_pattern);
        let cancel = AtomicBool::new(true);

        let engine = AveragingEngine::new(cfg).unwrap();
        assert!(matches!(
            engine.analyze_with_cancel(&source, &cancel),
            Err(PsdError::Cancelled)
        ));

        cancel.store(false, Ordering::Relaxed);
        assert!(engine.analyze_with_cancel(&source, &cancel).is_ok());
    }
}
