//! # pcapdns
//!
//! Offline DNS traffic analysis for PCAP captures.
//!
//! pcapdns reads a finished capture file (PCAP or PCAPNG, optionally
//! gzipped), reconstructs DNS query/response transactions from the raw
//! UDP/TCP datagrams, aggregates traffic statistics, and flags transactions
//! that look like amplification-attack traffic. The result is a single JSON
//! report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pcapdns::analyze::DnsAnalyzer;
//!
//! let report = DnsAnalyzer::new().analyze_file("capture.pcap").unwrap();
//! println!("{} transactions, {} flagged",
//!     report.transactions,
//!     report.suspected_amplification.len());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                             pcapdns                                |
//! +--------------------------------------------------------------------+
//! |  io/        - compression detection, PCAP/PCAPNG frame stream      |
//! |  pcap/      - capture file access, Frame                           |
//! |  protocol/  - Ethernet/IP/UDP/TCP decoding, DNS message parsing    |
//! |  analyze/   - transaction matching, statistics, amplification      |
//! |               detection, report assembly                           |
//! |  cli/       - command-line argument definitions                    |
//! |  error/     - error types                                          |
//! +--------------------------------------------------------------------+
//! ```
//!
//! The pipeline is a single forward pass: frames are decoded in capture
//! order, queries wait in the matcher's pending map, and responses complete
//! them as they arrive. Nothing is buffered beyond in-flight queries, so
//! memory stays bounded by the number of unanswered queries in the capture.

pub mod analyze;
pub mod cli;
pub mod error;
pub mod io;
pub mod pcap;
pub mod protocol;

// Re-export commonly used types at crate root for convenience
pub use analyze::{
    AmplificationCandidate, AmplificationConfig, DnsAnalyzer, Report, Totals, Transaction,
    TransactionMatcher,
};
pub use error::{Error, PcapError, Result};
pub use pcap::{CaptureFile, Frame};
pub use protocol::{DecodedPacket, DnsMessage, FlowEndpoint, Transport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
