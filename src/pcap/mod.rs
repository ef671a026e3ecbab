//! PCAP capture file access.

mod packet;
mod reader;

pub use packet::{Frame, LINKTYPE_ETHERNET};
pub use reader::CaptureFile;
