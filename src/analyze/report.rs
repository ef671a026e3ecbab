//! Final analysis report.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::amplification::AmplificationCandidate;
use crate::error::Result;

/// Global packet and message counters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Totals {
    pub packets: u64,
    pub queries: u64,
    pub responses: u64,
}

/// The finished analysis of one capture.
///
/// Assembled once at the end of the pass and immutable thereafter; the
/// analyzer's `finish` consumes the working state, so a report cannot be
/// built from a pass still in flight.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub totals: Totals,
    /// Distinct client addresses
    pub clients: usize,
    /// Distinct server addresses
    pub servers: usize,
    /// Query counts per question type
    pub qtypes: BTreeMap<String, u64>,
    /// Fully matched query/response pairs
    pub transactions: u64,
    /// Flagged transactions, in completion order
    pub suspected_amplification: Vec<AmplificationCandidate>,
}

impl Report {
    /// Serialize the report as a JSON object to `writer`.
    pub fn write_json<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        } else {
            serde_json::to_writer(&mut *writer, self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Serialize the report to a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e).into())
    }
}
