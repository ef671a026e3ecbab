//! UDP/TCP transport layer decoding.

use etherparse::{TcpHeaderSlice, UdpHeaderSlice};

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// Transport protocol of a decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Udp,
    Tcp,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Udp => write!(f, "udp"),
            Transport::Tcp => write!(f, "tcp"),
        }
    }
}

/// Decoded transport header: protocol, ports, and where the payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportHeader {
    pub transport: Transport,
    pub src_port: u16,
    pub dst_port: u16,
    /// Offset of the payload, relative to the start of the transport header
    pub header_len: usize,
}

impl TransportHeader {
    /// Decode a UDP or TCP header selected by the IP protocol number.
    ///
    /// Returns `None` for other protocols and for truncated headers.
    pub fn decode(data: &[u8], ip_protocol: u8) -> Option<Self> {
        match ip_protocol {
            IP_PROTO_UDP => {
                let udp = UdpHeaderSlice::from_slice(data).ok()?;
                Some(TransportHeader {
                    transport: Transport::Udp,
                    src_port: udp.source_port(),
                    dst_port: udp.destination_port(),
                    header_len: 8, // UDP header is always 8 bytes
                })
            }
            IP_PROTO_TCP => {
                let tcp = TcpHeaderSlice::from_slice(data).ok()?;
                Some(TransportHeader {
                    transport: Transport::Tcp,
                    src_port: tcp.source_port(),
                    dst_port: tcp.destination_port(),
                    header_len: tcp.slice().len(),
                })
            }
            _ => None,
        }
    }
}
