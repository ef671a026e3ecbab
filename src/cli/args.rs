//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::analyze::{AmplificationConfig, RATIO_THRESHOLD, RESPONSE_SIZE_FLOOR};

/// Analyze DNS traffic in a PCAP capture.
#[derive(Parser, Debug)]
#[command(name = "pcapdns")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture file to analyze (PCAP or PCAPNG, optionally gzipped)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the JSON report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "REPORT_FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Response-to-query size ratio that flags a transaction
    #[arg(long = "min-ratio", value_name = "RATIO", default_value_t = RATIO_THRESHOLD)]
    pub min_ratio: f64,

    /// Absolute response size (bytes) that flags a transaction
    #[arg(long = "min-response-bytes", value_name = "BYTES", default_value_t = RESPONSE_SIZE_FLOOR)]
    pub min_response_bytes: usize,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Detection thresholds selected on the command line.
    pub fn amplification_config(&self) -> AmplificationConfig {
        AmplificationConfig {
            ratio_threshold: self.min_ratio,
            response_size_floor: self.min_response_bytes,
        }
    }
}
