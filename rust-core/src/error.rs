//! Error types for capture analysis

use thiserror::Error;

/// Invalid analysis configuration, detected before the capture is touched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("channel count must be greater than zero")]
    ZeroChannels,

    #[error("FFT size must be at least 2 (got {0})")]
    FftSizeTooSmall(usize),

    #[error("sample rate must be a positive number of Hz (got {0})")]
    InvalidSampleRate(f64),

    #[error("requested averages must be greater than zero")]
    ZeroAverages,

    #[error("channel {channel} out of range for a {channel_count}-channel capture")]
    ChannelOutOfRange { channel: usize, channel_count: usize },
}

#[derive(Error, Debug)]
pub enum PsdError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error(
        "capture holds {samples_per_channel} complex samples per channel, \
         fewer than one {fft_size}-point segment"
    )]
    InsufficientData {
        samples_per_channel: u64,
        fft_size: usize,
    },

    #[error("capture I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("analysis cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PsdError>;
