//! Single-pass DNS traffic analysis: transaction matching, aggregate
//! statistics, amplification detection, and report assembly.

mod amplification;
mod analyzer;
mod matcher;
mod report;
mod stats;

pub use amplification::{
    AmplificationCandidate, AmplificationConfig, AmplificationDetector, RATIO_THRESHOLD,
    RESPONSE_SIZE_FLOOR,
};
pub use analyzer::DnsAnalyzer;
pub use matcher::{Transaction, TransactionKey, TransactionMatcher};
pub use report::{Report, Totals};
pub use stats::StatsAggregator;
