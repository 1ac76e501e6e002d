//! In-memory sample source

use super::{clipped_count, SampleSource};
use std::io;

/// Owned interleaved samples, useful for tests and for captures already in RAM
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: Vec<i16>,
}

impl MemorySource {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }
}

impl From<Vec<i16>> for MemorySource {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

impl SampleSource for MemorySource {
    fn read_samples(&self, offset: u64, count: usize) -> io::Result<Vec<i16>> {
        let n = clipped_count(offset, count, self.total_length());
        if n == 0 {
            return Ok(Vec::new());
        }
        let start = offset as usize;
        Ok(self.samples[start..start + n].to_vec())
    }

    fn total_length(&self) -> u64 {
        self.samples.len() as u64
    }
}
