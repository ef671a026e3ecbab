//! Packet and DNS message decoding.
//!
//! Decoding is layered the way the wire is: Ethernet (plus an optional
//! 802.1Q tag), then IPv4/IPv6, then UDP/TCP, then the DNS payload. Every
//! layer fails softly: a frame that cannot be taken down to a transport
//! payload is skipped, never an error.

mod dns;
mod ethernet;
mod ip;
mod packet;
mod transport;

pub use dns::{qtype_name, rcode, record_type, DnsMessage, DNS_PORT};
pub use ethernet::{ethertype, EthernetHeader};
pub use ip::IpHeader;
pub use packet::{DecodedPacket, FlowEndpoint};
pub use transport::{Transport, TransportHeader};
