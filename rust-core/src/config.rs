//! Analysis configuration

use crate::error::ConfigError;

/// Capture layout and averaging parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Number of interleaved channels in the capture
    pub channel_count: usize,

    /// Per-channel complex sample rate in Hz
    pub sample_rate_hz: f64,

    /// FFT size (number of complex samples per segment, should be power of 2)
    pub fft_size: usize,

    /// Number of segments to average; clamped to what the capture can supply
    pub requested_averages: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channel_count: 8,
            sample_rate_hz: 250e6,
            fft_size: 2048,
            requested_averages: 50,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_count == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.fft_size < 2 {
            return Err(ConfigError::FftSizeTooSmall(self.fft_size));
        }
        // NaN fails this comparison too
        if !(self.sample_rate_hz > 0.0) || !self.sample_rate_hz.is_finite() {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        if self.requested_averages == 0 {
            return Err(ConfigError::ZeroAverages);
        }
        Ok(())
    }

    /// Raw i16 elements in one time sample across all channels (I and Q each)
    pub fn frame_len(&self) -> usize {
        self.channel_count * 2
    }

    /// Raw i16 elements covering one segment for every channel
    pub fn block_len(&self) -> usize {
        self.fft_size * self.frame_len()
    }

    pub fn check_channel(&self, channel: usize) -> Result<(), ConfigError> {
        if channel >= self.channel_count {
            return Err(ConfigError::ChannelOutOfRange {
                channel,
                channel_count: self.channel_count,
            });
        }
        Ok(())
    }
}
