//! Capture input plumbing: compression detection and PCAP/PCAPNG framing.

mod decompress;
mod pcap_stream;

pub use decompress::{Compression, DecompressReader};
pub use pcap_stream::{CaptureReader, PcapFormat};
