//! Capture file reader with automatic compression handling.
//!
//! [`CaptureFile`] wraps [`CaptureReader`](crate::io::CaptureReader) and adds:
//! - File opening with a path-based API
//! - Automatic gzip detection and decompression
//! - PCAP format detection (legacy vs PCAPNG)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, PcapError};
use crate::io::{CaptureReader, Compression, DecompressReader, PcapFormat};
use crate::pcap::Frame;

/// Reader for PCAP and PCAPNG capture files, with optional decompression.
///
/// # Example
///
/// ```ignore
/// use pcapdns::pcap::CaptureFile;
///
/// let mut capture = CaptureFile::open("capture.pcap.gz")?;
/// while let Some(frame) = capture.next_frame()? {
///     println!("frame {}: {} bytes", frame.frame_number, frame.data.len());
/// }
/// ```
pub struct CaptureFile {
    inner: CaptureReader<DecompressReader<File>>,
}

impl CaptureFile {
    /// Open a capture file for reading.
    ///
    /// Detects gzip compression and the capture format from magic bytes.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|_| {
            Error::Pcap(PcapError::FileNotFound {
                path: path.display().to_string(),
            })
        })?;

        let mut header = [0u8; 6];
        let bytes_read = file.read(&mut header).map_err(|_| {
            Error::Pcap(PcapError::InvalidFormat {
                reason: "file too short to read header".to_string(),
            })
        })?;

        if bytes_read < 4 {
            return Err(Error::Pcap(PcapError::InvalidFormat {
                reason: "file too short".to_string(),
            }));
        }

        let compression = Compression::detect(&header);

        // The capture magic sits behind the compression layer, so read it
        // through a throwaway decoder, then reopen for the real pass.
        let file = File::open(path)?;
        let mut probe = DecompressReader::new(file, compression);
        let mut magic = [0u8; 4];
        probe.read_exact(&mut magic).map_err(|_| {
            Error::Pcap(PcapError::InvalidFormat {
                reason: "file too short to read magic number".to_string(),
            })
        })?;
        let format = PcapFormat::detect(&magic)?;
        drop(probe);

        let file = File::open(path)?;
        let decoder = DecompressReader::new(file, compression);
        let inner = CaptureReader::with_format(decoder, format)?;

        Ok(Self { inner })
    }

    /// Get the link type of the capture (e.g., 1 = Ethernet).
    #[inline]
    pub fn link_type(&self) -> u16 {
        self.inner.link_type()
    }

    /// Get the number of frames read so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` at end of file.
    #[inline]
    pub fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.inner.next_frame()
    }
}

/// Iterator adapter for CaptureFile.
impl Iterator for CaptureFile {
    type Item = Result<Frame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
