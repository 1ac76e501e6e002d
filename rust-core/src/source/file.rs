//! File-backed sample source
//!
//! Reads are positioned (seek + read) so only the requested span is ever
//! loaded; captures far larger than RAM can be analyzed.

use super::{clipped_count, SampleSource};
use byteorder::{ByteOrder, NativeEndian};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const BYTES_PER_ELEMENT: u64 = 2;

/// Raw capture file of native-endian i16 samples with no header
///
/// The file handle is shared behind a mutex so one source can serve several
/// analysis threads at once.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Mutex<File>,
    total_length: u64,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let byte_len = file.metadata()?.len();

        log::debug!("opened capture {} ({} bytes)", path.display(), byte_len);

        Ok(Self {
            path,
            file: Mutex::new(file),
            // A trailing odd byte cannot form an element
            total_length: byte_len / BYTES_PER_ELEMENT,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SampleSource for FileSource {
    fn read_samples(&self, offset: u64, count: usize) -> io::Result<Vec<i16>> {
        let n = clipped_count(offset, count, self.total_length);
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut bytes = vec![0u8; n * BYTES_PER_ELEMENT as usize];
        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture file lock poisoned"))?;
            file.seek(SeekFrom::Start(offset * BYTES_PER_ELEMENT))?;
            file.read_exact(&mut bytes)?;
        }

        let mut samples = vec![0i16; n];
        NativeEndian::read_i16_into(&bytes, &mut samples);
        Ok(samples)
    }

    fn total_length(&self) -> u64 {
        self.total_length
    }
}
