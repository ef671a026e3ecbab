//! Amplification candidate detection.
//!
//! A matched transaction is flagged when its response is disproportionately
//! large relative to the query, or large in absolute terms. This is a
//! heuristic over observed traffic, not proof of an attack; the output is
//! advisory.

use serde::Serialize;

use super::matcher::Transaction;

/// Response-to-query size ratio at which a transaction is flagged.
pub const RATIO_THRESHOLD: f64 = 5.0;

/// Absolute response size (bytes) at which a transaction is flagged even
/// when the query itself was not small.
pub const RESPONSE_SIZE_FLOOR: usize = 600;

/// Detection thresholds.
#[derive(Debug, Clone, Copy)]
pub struct AmplificationConfig {
    pub ratio_threshold: f64,
    pub response_size_floor: usize,
}

impl Default for AmplificationConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: RATIO_THRESHOLD,
            response_size_floor: RESPONSE_SIZE_FLOOR,
        }
    }
}

/// A transaction flagged as a possible amplification vector.
#[derive(Debug, Clone, Serialize)]
pub struct AmplificationCandidate {
    pub qtype: String,
    pub query_name: String,
    pub client: String,
    pub server: String,
    pub query_bytes: usize,
    pub response_bytes: usize,
    pub ratio: f64,
}

/// Applies the ratio/absolute-size rule to completed transactions.
#[derive(Debug, Default)]
pub struct AmplificationDetector {
    config: AmplificationConfig,
    candidates: Vec<AmplificationCandidate>,
}

impl AmplificationDetector {
    pub fn new(config: AmplificationConfig) -> Self {
        Self {
            config,
            candidates: Vec::new(),
        }
    }

    /// Evaluate a completed transaction, flagging it if it crosses either
    /// threshold. Candidates accumulate in the order transactions complete.
    pub fn observe(&mut self, transaction: &Transaction) {
        let query_bytes = transaction.query.wire_len;
        let response_bytes = transaction.response.wire_len;
        let ratio = response_bytes as f64 / query_bytes.max(1) as f64;

        if ratio >= self.config.ratio_threshold || response_bytes >= self.config.response_size_floor
        {
            self.candidates.push(AmplificationCandidate {
                qtype: transaction.query.qtype_name(),
                query_name: transaction.query.query_name.clone(),
                client: transaction.key.client.to_string(),
                server: transaction.key.server.to_string(),
                query_bytes,
                response_bytes,
                ratio,
            });
        }
    }

    pub fn candidates(&self) -> &[AmplificationCandidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<AmplificationCandidate> {
        self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::matcher::TransactionKey;
    use crate::protocol::{record_type, DnsMessage, FlowEndpoint};
    use std::net::{IpAddr, Ipv4Addr};

    fn transaction(qtype: u16, query_bytes: usize, response_bytes: usize) -> Transaction {
        let client = FlowEndpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 40000);
        let server = FlowEndpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), 53);

        let query = DnsMessage {
            transaction_id: 0x1234,
            is_response: false,
            opcode: 0,
            response_code: 0,
            question_count: 1,
            answer_count: 0,
            query_name: "example.com".to_string(),
            qtype,
            qclass: 1,
            wire_len: query_bytes,
        };
        let mut response = query.clone();
        response.is_response = true;
        response.answer_count = 4;
        response.wire_len = response_bytes;

        Transaction {
            key: TransactionKey {
                transaction_id: 0x1234,
                client,
                server,
            },
            query,
            response,
            query_timestamp_us: 0,
            response_timestamp_us: 1000,
        }
    }

    #[test]
    fn test_high_ratio_flagged() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        detector.observe(&transaction(record_type::ANY, 40, 400));

        let candidates = detector.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].qtype, "ANY");
        assert!((candidates[0].ratio - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_large_response_flagged_despite_low_ratio() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        // Ratio 2.0, but the absolute floor catches it
        detector.observe(&transaction(record_type::TXT, 400, 800));

        assert_eq!(detector.candidates().len(), 1);
        assert_eq!(detector.candidates()[0].response_bytes, 800);
    }

    #[test]
    fn test_ordinary_transaction_not_flagged() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        detector.observe(&transaction(record_type::A, 40, 56));

        assert!(detector.candidates().is_empty());
    }

    #[test]
    fn test_boundary_ratio_exactly_threshold() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        // 200 / 40 == 5.0 exactly: flagged (>= comparison)
        detector.observe(&transaction(record_type::A, 40, 200));

        assert_eq!(detector.candidates().len(), 1);
    }

    #[test]
    fn test_zero_byte_query_does_not_divide_by_zero() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        detector.observe(&transaction(record_type::A, 0, 100));

        assert_eq!(detector.candidates().len(), 1);
        assert!((detector.candidates()[0].ratio - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AmplificationConfig {
            ratio_threshold: 2.0,
            response_size_floor: 10_000,
        };
        let mut detector = AmplificationDetector::new(config);
        detector.observe(&transaction(record_type::A, 40, 100));

        assert_eq!(detector.candidates().len(), 1);
    }

    #[test]
    fn test_candidates_in_completion_order() {
        let mut detector = AmplificationDetector::new(AmplificationConfig::default());
        detector.observe(&transaction(record_type::ANY, 40, 400));
        detector.observe(&transaction(record_type::TXT, 40, 600));

        let candidates = detector.candidates();
        assert_eq!(candidates[0].qtype, "ANY");
        assert_eq!(candidates[1].qtype, "TXT");
    }
}
