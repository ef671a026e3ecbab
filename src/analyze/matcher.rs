//! DNS transaction correlation.
//!
//! Queries go into a pending map keyed by (transaction id, client endpoint,
//! server endpoint). A response computes the same key from its mirrored
//! tuple (its destination is the client, its source the server) and
//! consumes the pending entry. Transaction IDs are scoped per flow: two
//! clients reusing an ID against the same server occupy different keys.

use std::collections::HashMap;

use crate::protocol::{DnsMessage, FlowEndpoint};

/// Key identifying an in-flight DNS transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    pub transaction_id: u16,
    pub client: FlowEndpoint,
    pub server: FlowEndpoint,
}

/// A completed query/response pair.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub key: TransactionKey,
    pub query: DnsMessage,
    pub response: DnsMessage,
    pub query_timestamp_us: i64,
    pub response_timestamp_us: i64,
}

#[derive(Debug, Clone)]
struct PendingQuery {
    message: DnsMessage,
    timestamp_us: i64,
}

/// Correlates responses to their originating queries in stream order.
#[derive(Debug, Default)]
pub struct TransactionMatcher {
    pending: HashMap<TransactionKey, PendingQuery>,
    completed: Vec<Transaction>,
    unmatched_responses: u64,
    retransmitted_queries: u64,
}

impl TransactionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query. Its source is the client, its destination the server.
    ///
    /// A second query with the same key before any response is a client
    /// retransmission; it replaces the pending entry so a later response
    /// pairs with the nearest preceding query.
    pub fn observe_query(
        &mut self,
        message: DnsMessage,
        src: FlowEndpoint,
        dst: FlowEndpoint,
        timestamp_us: i64,
    ) {
        let key = TransactionKey {
            transaction_id: message.transaction_id,
            client: src,
            server: dst,
        };

        let pending = PendingQuery {
            message,
            timestamp_us,
        };
        if self.pending.insert(key, pending).is_some() {
            self.retransmitted_queries += 1;
        }
    }

    /// Record a response, completing a transaction if its mirrored key has a
    /// pending query.
    ///
    /// Returns the completed transaction, or `None` for an unmatched
    /// response: no pending query, or a duplicate of an already-matched
    /// response whose first copy consumed the pending entry.
    pub fn observe_response(
        &mut self,
        message: DnsMessage,
        src: FlowEndpoint,
        dst: FlowEndpoint,
        timestamp_us: i64,
    ) -> Option<&Transaction> {
        let key = TransactionKey {
            transaction_id: message.transaction_id,
            client: dst,
            server: src,
        };

        match self.pending.remove(&key) {
            Some(query) => {
                self.completed.push(Transaction {
                    key,
                    query: query.message,
                    response: message,
                    query_timestamp_us: query.timestamp_us,
                    response_timestamp_us: timestamp_us,
                });
                self.completed.last()
            }
            None => {
                self.unmatched_responses += 1;
                None
            }
        }
    }

    /// Completed transactions, in completion order.
    pub fn completed(&self) -> &[Transaction] {
        &self.completed
    }

    /// Number of fully matched transactions.
    pub fn completed_count(&self) -> u64 {
        self.completed.len() as u64
    }

    /// Queries still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Responses that never found a pending query.
    pub fn unmatched_responses(&self) -> u64 {
        self.unmatched_responses
    }

    /// Queries replaced by a retransmission with the same key.
    pub fn retransmitted_queries(&self) -> u64 {
        self.retransmitted_queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::record_type;
    use std::net::{IpAddr, Ipv4Addr};

    fn endpoint(last_octet: u8, port: u16) -> FlowEndpoint {
        FlowEndpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last_octet)), port)
    }

    fn message(id: u16, is_response: bool, wire_len: usize) -> DnsMessage {
        DnsMessage {
            transaction_id: id,
            is_response,
            opcode: 0,
            response_code: 0,
            question_count: 1,
            answer_count: if is_response { 1 } else { 0 },
            query_name: "example.com".to_string(),
            qtype: record_type::A,
            qclass: 1,
            wire_len,
        }
    }

    #[test]
    fn test_query_then_response_completes() {
        let mut matcher = TransactionMatcher::new();
        let client = endpoint(1, 40000);
        let server = endpoint(2, 53);

        matcher.observe_query(message(0x1234, false, 40), client, server, 100);
        assert_eq!(matcher.pending_count(), 1);

        let txn = matcher
            .observe_response(message(0x1234, true, 120), server, client, 200)
            .expect("should match");
        assert_eq!(txn.query.wire_len, 40);
        assert_eq!(txn.response.wire_len, 120);
        assert_eq!(txn.query_timestamp_us, 100);
        assert_eq!(txn.response_timestamp_us, 200);

        assert_eq!(matcher.pending_count(), 0);
        assert_eq!(matcher.completed_count(), 1);
    }

    #[test]
    fn test_unmatched_response() {
        let mut matcher = TransactionMatcher::new();
        let client = endpoint(1, 40000);
        let server = endpoint(2, 53);

        let txn = matcher.observe_response(message(0x9999, true, 80), server, client, 100);
        assert!(txn.is_none());
        assert_eq!(matcher.unmatched_responses(), 1);
        assert_eq!(matcher.completed_count(), 0);
    }

    #[test]
    fn test_id_mismatch_stays_pending() {
        let mut matcher = TransactionMatcher::new();
        let client = endpoint(1, 40000);
        let server = endpoint(2, 53);

        matcher.observe_query(message(0x1111, false, 40), client, server, 100);
        assert!(matcher
            .observe_response(message(0x2222, true, 80), server, client, 200)
            .is_none());

        assert_eq!(matcher.pending_count(), 1);
        assert_eq!(matcher.unmatched_responses(), 1);
    }

    #[test]
    fn test_same_id_different_clients_no_collision() {
        let mut matcher = TransactionMatcher::new();
        let client_a = endpoint(1, 40000);
        let client_b = endpoint(3, 40000);
        let server = endpoint(2, 53);

        matcher.observe_query(message(0x1234, false, 40), client_a, server, 100);
        matcher.observe_query(message(0x1234, false, 44), client_b, server, 110);
        assert_eq!(matcher.pending_count(), 2);

        matcher.observe_response(message(0x1234, true, 100), server, client_a, 200);
        matcher.observe_response(message(0x1234, true, 104), server, client_b, 210);

        assert_eq!(matcher.completed_count(), 2);
        assert_eq!(matcher.pending_count(), 0);

        let completed = matcher.completed();
        assert_eq!(completed[0].key.client, client_a);
        assert_eq!(completed[1].key.client, client_b);
    }

    #[test]
    fn test_retransmitted_query_replaces_pending() {
        let mut matcher = TransactionMatcher::new();
        let client = endpoint(1, 40000);
        let server = endpoint(2, 53);

        matcher.observe_query(message(0x1234, false, 40), client, server, 100);
        matcher.observe_query(message(0x1234, false, 40), client, server, 150);

        assert_eq!(matcher.pending_count(), 1);
        assert_eq!(matcher.retransmitted_queries(), 1);

        let txn = matcher
            .observe_response(message(0x1234, true, 90), server, client, 200)
            .unwrap();
        // Matched against the nearest preceding query
        assert_eq!(txn.query_timestamp_us, 150);
    }

    #[test]
    fn test_duplicate_response_is_unmatched() {
        let mut matcher = TransactionMatcher::new();
        let client = endpoint(1, 40000);
        let server = endpoint(2, 53);

        matcher.observe_query(message(0x1234, false, 40), client, server, 100);
        assert!(matcher
            .observe_response(message(0x1234, true, 90), server, client, 200)
            .is_some());
        // Retransmitted response: the pending entry is gone
        assert!(matcher
            .observe_response(message(0x1234, true, 90), server, client, 210)
            .is_none());

        assert_eq!(matcher.completed_count(), 1);
        assert_eq!(matcher.unmatched_responses(), 1);
    }
}
