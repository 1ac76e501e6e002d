//! Bin-to-frequency mapping for center-shifted spectra

use super::fft::fft_shift;

/// Frequency of each unshifted FFT bin in Hz
///
/// Bins below `(fft_size + 1) / 2` are non-negative; the rest wrap to
/// negative frequencies `(k - fft_size) * fs / fft_size`.
pub fn bin_frequencies_hz(fft_size: usize, sample_rate_hz: f64) -> Vec<f64> {
    let n = fft_size as f64;
    let positive = (fft_size + 1) / 2;
    (0..fft_size)
        .map(|k| {
            let signed = if k < positive {
                k as f64
            } else {
                k as f64 - n
            };
            signed * sample_rate_hz / n
        })
        .collect()
}

/// Frequency axis in MHz matching `FftEngine::compute_power_shifted` ordering
///
/// Ordered from most negative to most positive frequency with DC at index
/// `fft_size/2`.
pub fn build_axis(fft_size: usize, sample_rate_hz: f64) -> Vec<f64> {
    let mut axis: Vec<f64> = bin_frequencies_hz(fft_size, sample_rate_hz)
        .into_iter()
        .map(|f| f / 1e6)
        .collect();
    fft_shift(&mut axis);
    axis
}

/// Bin spacing in Hz
pub fn bin_width_hz(fft_size: usize, sample_rate_hz: f64) -> f64 {
    sample_rate_hz / fft_size as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unshifted_bins() {
        let bins = bin_frequencies_hz(4, 4.0);
        assert_eq!(bins, vec![0.0, 1.0, -2.0, -1.0]);

        let bins = bin_frequencies_hz(5, 5.0);
        assert_eq!(bins, vec![0.0, 1.0, 2.0, -2.0, -1.0]);
    }

    #[test]
    fn test_axis_symmetry_2048_at_250mhz() {
        let fft_size = 2048;
        let fs = 250e6;
        let axis = build_axis(fft_size, fs);

        assert_eq!(axis.len(), fft_size);
        assert_eq!(axis[fft_size / 2], 0.0);
        assert!((axis[0] + 125.0).abs() < 1e-9);
        assert!(axis[fft_size - 1] < 125.0);
        assert!((axis[fft_size - 1] - (125.0 - 250.0 / 2048.0)).abs() < 1e-9);

        let spacing_mhz = bin_width_hz(fft_size, fs) / 1e6;
        for pair in axis.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - spacing_mhz).abs() < 1e-9);
        }
    }

    #[test]
    fn test_odd_axis_is_monotonic_and_centered() {
        let axis = build_axis(5, 5e6);
        assert_eq!(axis, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }
}
