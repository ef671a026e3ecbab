//! Raw link-layer frame as read from a capture.

use bytes::Bytes;

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// A single captured link-layer frame.
///
/// Frames are ephemeral: the analysis pass decodes each one and drops it
/// before reading the next.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (1-indexed).
    pub frame_number: u64,

    /// Capture timestamp in microseconds since epoch.
    pub timestamp_us: i64,

    /// Captured length (may be less than original).
    pub captured_length: u32,

    /// Original length on the wire.
    pub original_length: u32,

    /// Link layer type (e.g., 1 = Ethernet).
    pub link_type: u16,

    /// Raw frame data.
    pub data: Bytes,
}

impl Frame {
    /// Whether the capture truncated this frame.
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.original_length
    }
}
