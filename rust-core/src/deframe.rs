//! Channel deframing
//!
//! Captures are laid out as repeating frames of
//! `[ch0_I, ch0_Q, ch1_I, ch1_Q, ..., chN_I, chN_Q]`. A segment covers
//! `fft_size` consecutive frames; one channel's samples sit at stride
//! `channel_count * 2` within that block, I at offset `channel * 2` and Q
//! right after it.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::source::SampleSource;
use num_complex::Complex64;

/// One channel's complex samples for one segment index
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub channel: usize,
    pub index: usize,

    /// Exactly `fft_size` samples; zero-padded past `valid_len`
    pub samples: Vec<Complex64>,

    /// Number of samples actually read from the capture
    pub valid_len: usize,
}

impl Segment {
    pub fn is_padded(&self) -> bool {
        self.valid_len < self.samples.len()
    }
}

/// First raw element of segment `segment_index`
pub fn segment_start(segment_index: usize, config: &AnalysisConfig) -> u64 {
    segment_index as u64 * config.block_len() as u64
}

/// Extract one channel's complex samples for one segment
///
/// Reads the full multiplexed block for the segment and picks out the
/// channel's I/Q pairs. If the capture ends inside the block, the missing
/// samples are zero. A trailing I without its Q counts as missing.
pub fn extract_channel<S: SampleSource + ?Sized>(
    source: &S,
    channel: usize,
    segment_index: usize,
    config: &AnalysisConfig,
) -> Result<Segment> {
    config.check_channel(channel)?;

    let block = source.read_samples(segment_start(segment_index, config), config.block_len())?;
    let mut samples = deinterleave(&block, channel, config);
    let valid_len = samples.len();
    samples.resize(config.fft_size, Complex64::new(0.0, 0.0));

    Ok(Segment {
        channel,
        index: segment_index,
        samples,
        valid_len,
    })
}

/// Pick one channel's I/Q pairs out of an interleaved block
fn deinterleave(block: &[i16], channel: usize, config: &AnalysisConfig) -> Vec<Complex64> {
    let stride = config.frame_len();
    let offset = channel * 2;

    block
        .get(offset..)
        .unwrap_or(&[])
        .chunks(stride)
        .take(config.fft_size)
        .filter(|frame| frame.len() >= 2)
        .map(|frame| Complex64::new(frame[0] as f64, frame[1] as f64))
        .collect()
}
