//! Random-access providers of raw interleaved i16 samples

pub mod file;
pub mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use std::io;

/// Flat sequence of interleaved 16-bit I/Q samples
///
/// Offsets and counts are in elements (i16 values), not bytes. Reads that
/// run past the end are clipped rather than failing, so a read starting at or
/// beyond `total_length()` returns an empty vector.
pub trait SampleSource {
    /// Read up to `count` elements starting at element `offset`
    fn read_samples(&self, offset: u64, count: usize) -> io::Result<Vec<i16>>;

    /// Total number of i16 elements in the source
    fn total_length(&self) -> u64;

    /// Complex samples available to each channel (partial frames are ignored)
    fn samples_per_channel(&self, channel_count: usize) -> u64 {
        if channel_count == 0 {
            return 0;
        }
        self.total_length() / (2 * channel_count as u64)
    }
}

/// Number of elements a read of `count` at `offset` yields from `total`
pub(crate) fn clipped_count(offset: u64, count: usize, total: u64) -> usize {
    let remaining = total.saturating_sub(offset);
    (count as u64).min(remaining) as usize
}
