//! Aggregate traffic statistics.

use std::collections::{BTreeMap, HashSet};
use std::net::IpAddr;

use crate::protocol::DnsMessage;

/// Running totals over one pass of the capture.
///
/// Every operation is a commutative increment or set insertion, so final
/// counts do not depend on anything but the multiset of observed packets.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    packets: u64,
    queries: u64,
    responses: u64,
    qtype_counts: BTreeMap<String, u64>,
    clients: HashSet<IpAddr>,
    servers: HashSet<IpAddr>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decoded transport packet, DNS or not.
    pub fn record_packet(&mut self) {
        self.packets += 1;
    }

    /// Count a parsed query. Its source address is a client.
    pub fn record_query(&mut self, message: &DnsMessage, src_addr: IpAddr) {
        self.queries += 1;
        *self
            .qtype_counts
            .entry(message.qtype_name())
            .or_insert(0) += 1;
        self.clients.insert(src_addr);
    }

    /// Count a parsed response. Its source address is a server.
    pub fn record_response(&mut self, src_addr: IpAddr) {
        self.responses += 1;
        self.servers.insert(src_addr);
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    pub fn queries(&self) -> u64 {
        self.queries
    }

    pub fn responses(&self) -> u64 {
        self.responses
    }

    /// Distinct client addresses (sources of queries).
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Distinct server addresses (sources of responses).
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// Per-qtype query counts, ordered by qtype label.
    pub fn qtype_counts(&self) -> &BTreeMap<String, u64> {
        &self.qtype_counts
    }

    /// Consume the aggregator, keeping the qtype map.
    pub fn into_qtype_counts(self) -> BTreeMap<String, u64> {
        self.qtype_counts
    }
}
