//! IPv4/IPv6 network layer decoding.

use std::net::IpAddr;

use etherparse::{Ipv4HeaderSlice, Ipv6HeaderSlice};

use super::ethernet::ethertype;

/// IPv6 extension header next-header values we know how to walk.
mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const DESTINATION: u8 = 60;
}

/// Decoded network-layer header.
///
/// `payload_len` is bounded by the IP header's declared length, not the
/// frame length, so Ethernet padding on short frames is not mistaken for
/// transport payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpHeader {
    pub src: IpAddr,
    pub dst: IpAddr,
    /// Transport protocol number (6 = TCP, 17 = UDP)
    pub protocol: u8,
    /// Offset of the transport header, relative to the start of the IP header
    pub header_len: usize,
    /// Declared transport-layer length (header + payload)
    pub payload_len: usize,
}

impl IpHeader {
    /// Decode an IPv4 or IPv6 header selected by `ethertype`.
    ///
    /// Returns `None` for non-IP ethertypes, truncated headers, and
    /// fragmented packets (a fragment does not carry a complete transport
    /// payload).
    pub fn decode(data: &[u8], ethertype: u16) -> Option<Self> {
        match ethertype {
            ethertype::IPV4 => Self::decode_v4(data),
            ethertype::IPV6 => Self::decode_v6(data),
            _ => None,
        }
    }

    fn decode_v4(data: &[u8]) -> Option<Self> {
        let ipv4 = Ipv4HeaderSlice::from_slice(data).ok()?;

        if ipv4.more_fragments() || ipv4.fragments_offset().value() > 0 {
            return None;
        }

        let header_len = ipv4.slice().len();
        let payload_len = (ipv4.total_len() as usize).checked_sub(header_len)?;

        Some(IpHeader {
            src: IpAddr::from(ipv4.source()),
            dst: IpAddr::from(ipv4.destination()),
            protocol: ipv4.protocol().0,
            header_len,
            payload_len,
        })
    }

    fn decode_v6(data: &[u8]) -> Option<Self> {
        let ipv6 = Ipv6HeaderSlice::from_slice(data).ok()?;

        let mut protocol = ipv6.next_header().0;
        let mut header_len = 40usize;
        let mut payload_len = ipv6.payload_length() as usize;

        // Walk skippable extension headers. A fragment header means the
        // transport payload is split across packets, so give up on those.
        loop {
            match protocol {
                next_header::HOP_BY_HOP | next_header::ROUTING | next_header::DESTINATION => {
                    let ext = data.get(header_len..header_len + 2)?;
                    let ext_len = 8 + (ext[1] as usize) * 8;
                    protocol = ext[0];
                    header_len += ext_len;
                    payload_len = payload_len.checked_sub(ext_len)?;
                }
                next_header::FRAGMENT => return None,
                _ => break,
            }
        }

        Some(IpHeader {
            src: IpAddr::from(ipv6.source()),
            dst: IpAddr::from(ipv6.destination()),
            protocol,
            header_len,
            payload_len,
        })
    }
}
