//! Compression detection and decompression support.
//!
//! Captures are often stored gzipped. `DecompressReader<R>` wraps any `Read`
//! source and transparently decompresses it, using enum dispatch so the
//! uncompressed path stays allocation-free.

use std::io::{self, Read};

use flate2::read::GzDecoder;

/// Detected compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression
    None,
    /// Gzip (.gz)
    Gzip,
}

impl Compression {
    /// Detect compression format from magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        match data {
            // Gzip: 1f 8b
            [0x1f, 0x8b, ..] => Compression::Gzip,
            _ => Compression::None,
        }
    }

    /// Check if this represents compressed data.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Compression::None)
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// A `Read` wrapper that decompresses according to a detected format.
pub enum DecompressReader<R: Read> {
    /// Pass-through for uncompressed data
    Plain(R),
    /// Gzip decompression
    Gzip(Box<GzDecoder<R>>),
}

impl<R: Read> DecompressReader<R> {
    /// Wrap a source with the decoder for the given compression format.
    pub fn new(source: R, compression: Compression) -> Self {
        match compression {
            Compression::None => DecompressReader::Plain(source),
            Compression::Gzip => DecompressReader::Gzip(Box::new(GzDecoder::new(source))),
        }
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DecompressReader::Plain(r) => r.read(buf),
            DecompressReader::Gzip(r) => r.read(buf),
        }
    }
}
