//! Error types for pcapdns.
//!
//! Only capture-level framing problems are fatal. Per-packet problems
//! (non-IP frames, truncated transport headers, payloads that are not DNS)
//! are handled by skipping the packet and never surface here.

use thiserror::Error;

/// Main error type for pcapdns operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing the capture container
    #[error("capture error: {0}")]
    Pcap(#[from] PcapError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the capture container itself.
///
/// Any of these aborts the run: a capture whose framing is corrupt cannot be
/// partially analyzed.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Invalid PCAP/PCAPNG framing
    #[error("malformed capture: {reason}")]
    InvalidFormat { reason: String },

    /// Link layer we cannot decode
    #[error("unsupported link type: {link_type}")]
    UnsupportedLinkType { link_type: u16 },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
