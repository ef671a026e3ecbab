//! Single-pass capture analysis.
//!
//! One forward traversal of the capture drives the whole pipeline: frames
//! are decoded to transport payloads, DNS payloads are parsed, queries and
//! responses flow into the matcher and aggregator, and each completed
//! transaction is scored for amplification as it completes. No lookahead,
//! no second pass; matching correctness depends on stream order.

use std::path::Path;

use tracing::{debug, info};

use super::amplification::{AmplificationConfig, AmplificationDetector};
use super::matcher::TransactionMatcher;
use super::report::{Report, Totals};
use super::stats::StatsAggregator;
use crate::error::{Error, PcapError, Result};
use crate::pcap::{CaptureFile, Frame, LINKTYPE_ETHERNET};
use crate::protocol::{DecodedPacket, DnsMessage, Transport, DNS_PORT};

/// Analyzes the DNS traffic of one capture.
#[derive(Debug, Default)]
pub struct DnsAnalyzer {
    matcher: TransactionMatcher,
    stats: StatsAggregator,
    detector: AmplificationDetector,
    frames_seen: u64,
    frames_skipped: u64,
}

impl DnsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom detection thresholds.
    pub fn with_config(config: AmplificationConfig) -> Self {
        Self {
            detector: AmplificationDetector::new(config),
            ..Self::default()
        }
    }

    /// Analyze a capture file and produce the final report.
    pub fn analyze_file<P: AsRef<Path>>(self, path: P) -> Result<Report> {
        let capture = CaptureFile::open(path)?;
        self.run(capture)
    }

    /// Consume a frame source to completion and produce the final report.
    ///
    /// Fails fast on capture-level errors; per-frame problems are skipped.
    pub fn run<I>(mut self, frames: I) -> Result<Report>
    where
        I: IntoIterator<Item = Result<Frame>>,
    {
        for frame in frames {
            let frame = frame?;
            self.process_frame(&frame)?;
        }
        Ok(self.finish())
    }

    /// Feed one frame through the pipeline.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<()> {
        self.frames_seen += 1;

        if frame.link_type != LINKTYPE_ETHERNET {
            return Err(Error::Pcap(PcapError::UnsupportedLinkType {
                link_type: frame.link_type,
            }));
        }

        let packet = match DecodedPacket::decode(&frame.data) {
            Some(packet) => packet,
            None => {
                self.frames_skipped += 1;
                debug!(frame = frame.frame_number, "skipping undecodable frame");
                return Ok(());
            }
        };

        self.stats.record_packet();

        // Only port-53 traffic is treated as DNS
        if packet.src.port != DNS_PORT && packet.dst.port != DNS_PORT {
            return Ok(());
        }

        let message = match packet.transport {
            Transport::Udp => DnsMessage::parse(packet.payload),
            Transport::Tcp => DnsMessage::parse_tcp(packet.payload),
        };

        let message = match message {
            Some(message) => message,
            None => {
                debug!(frame = frame.frame_number, "payload is not DNS");
                return Ok(());
            }
        };

        if message.is_response {
            self.stats.record_response(packet.src.addr);
            if let Some(transaction) =
                self.matcher
                    .observe_response(message, packet.src, packet.dst, frame.timestamp_us)
            {
                self.detector.observe(transaction);
            }
        } else {
            self.stats.record_query(&message, packet.src.addr);
            self.matcher
                .observe_query(message, packet.src, packet.dst, frame.timestamp_us);
        }

        Ok(())
    }

    /// Assemble the final report. Pure assembly; consumes the pass state.
    pub fn finish(self) -> Report {
        info!(
            frames = self.frames_seen,
            skipped = self.frames_skipped,
            packets = self.stats.packets(),
            queries = self.stats.queries(),
            responses = self.stats.responses(),
            transactions = self.matcher.completed_count(),
            pending = self.matcher.pending_count(),
            unmatched_responses = self.matcher.unmatched_responses(),
            "capture analysis complete"
        );

        Report {
            totals: Totals {
                packets: self.stats.packets(),
                queries: self.stats.queries(),
                responses: self.stats.responses(),
            },
            clients: self.stats.client_count(),
            servers: self.stats.server_count(),
            transactions: self.matcher.completed_count(),
            qtypes: self.stats.into_qtype_counts(),
            suspected_amplification: self.detector.into_candidates(),
        }
    }
}
