//! Frame-to-transport-payload decoding.

use std::fmt;
use std::net::IpAddr;

use super::ethernet::EthernetHeader;
use super::ip::IpHeader;
use super::transport::{Transport, TransportHeader};

/// One side of a transport flow: address plus port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowEndpoint {
    pub addr: IpAddr,
    pub port: u16,
}

impl FlowEndpoint {
    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self { addr, port }
    }
}

impl fmt::Display for FlowEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            IpAddr::V4(ip) => write!(f, "{}:{}", ip, self.port),
            IpAddr::V6(ip) => write!(f, "[{}]:{}", ip, self.port),
        }
    }
}

/// A frame decoded down to its transport payload.
///
/// Borrows the frame's bytes; a `DecodedPacket` never outlives the frame it
/// was decoded from.
#[derive(Debug, Clone, Copy)]
pub struct DecodedPacket<'a> {
    pub transport: Transport,
    pub src: FlowEndpoint,
    pub dst: FlowEndpoint,
    pub payload: &'a [u8],
}

impl<'a> DecodedPacket<'a> {
    /// Decode an Ethernet frame down to its UDP/TCP payload.
    ///
    /// Returns `None` for anything that does not reach a complete transport
    /// payload: non-IP ethertypes, transports other than UDP/TCP, fragments,
    /// and headers or payloads cut short by the capture. Those frames are
    /// skipped, not errors.
    pub fn decode(data: &'a [u8]) -> Option<Self> {
        let eth = EthernetHeader::decode(data)?;
        let ip = IpHeader::decode(data.get(eth.header_len..)?, eth.ethertype)?;

        let transport_start = eth.header_len + ip.header_len;
        let th = TransportHeader::decode(data.get(transport_start..)?, ip.protocol)?;

        // Bound the payload by the IP header's declared length so Ethernet
        // padding is not counted, and demand the capture actually holds it.
        let payload_start = transport_start + th.header_len;
        let payload_end = transport_start + ip.payload_len;
        let payload = data.get(payload_start..payload_end)?;

        Some(DecodedPacket {
            transport: th.transport,
            src: FlowEndpoint::new(ip.src, th.src_port),
            dst: FlowEndpoint::new(ip.dst, th.dst_port),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    /// Build an Ethernet/IPv4/UDP frame around the given payload.
    fn build_udp_frame(
        src: (Ipv4Addr, u16),
        dst: (Ipv4Addr, u16),
        payload: &[u8],
        padding: usize,
    ) -> Vec<u8> {
        let mut frame = Vec::new();

        // Ethernet header
        frame.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        frame.extend_from_slice(&[0x08, 0x00]);

        // IPv4 header
        let total_len = (20 + 8 + payload.len()) as u16;
        frame.push(0x45);
        frame.push(0x00);
        frame.extend_from_slice(&total_len.to_be_bytes());
        frame.extend_from_slice(&[0x00, 0x01]);
        frame.extend_from_slice(&[0x00, 0x00]);
        frame.push(0x40);
        frame.push(17); // UDP
        frame.extend_from_slice(&[0x00, 0x00]);
        frame.extend_from_slice(&src.0.octets());
        frame.extend_from_slice(&dst.0.octets());

        // UDP header
        let udp_len = (8 + payload.len()) as u16;
        frame.extend_from_slice(&src.1.to_be_bytes());
        frame.extend_from_slice(&dst.1.to_be_bytes());
        frame.extend_from_slice(&udp_len.to_be_bytes());
        frame.extend_from_slice(&[0x00, 0x00]);

        frame.extend_from_slice(payload);
        frame.extend(std::iter::repeat(0u8).take(padding));
        frame
    }

    #[test]
    fn test_decode_udp_packet() {
        let payload = [0xde, 0xad, 0xbe, 0xef];
        let frame = build_udp_frame(
            (Ipv4Addr::new(10, 0, 0, 1), 49152),
            (Ipv4Addr::new(8, 8, 8, 8), 53),
            &payload,
            0,
        );

        let packet = DecodedPacket::decode(&frame).unwrap();
        assert_eq!(packet.transport, Transport::Udp);
        assert_eq!(packet.src.addr, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(packet.src.port, 49152);
        assert_eq!(packet.dst.port, 53);
        assert_eq!(packet.payload, &payload);
    }

    #[test]
    fn test_decode_ignores_ethernet_padding() {
        // Short frames are padded to the 60-byte Ethernet minimum; the
        // padding must not leak into the payload.
        let payload = [0x01, 0x02];
        let frame = build_udp_frame(
            (Ipv4Addr::new(10, 0, 0, 1), 1000),
            (Ipv4Addr::new(10, 0, 0, 2), 53),
            &payload,
            16,
        );

        let packet = DecodedPacket::decode(&frame).unwrap();
        assert_eq!(packet.payload, &payload);
    }

    #[test]
    fn test_decode_non_ip_frame_skipped() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, //
            0x08, 0x06, // ARP
            0x00, 0x01, 0x08, 0x00,
        ];
        assert!(DecodedPacket::decode(&frame).is_none());
    }

    #[test]
    fn test_decode_truncated_payload_skipped() {
        let payload = [0u8; 32];
        let mut frame = build_udp_frame(
            (Ipv4Addr::new(10, 0, 0, 1), 1000),
            (Ipv4Addr::new(10, 0, 0, 2), 53),
            &payload,
            0,
        );
        // Capture cut the frame short of the declared IP length
        frame.truncate(frame.len() - 16);

        assert!(DecodedPacket::decode(&frame).is_none());
    }

    #[test]
    fn test_flow_endpoint_display() {
        let v4 = FlowEndpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 53);
        assert_eq!(v4.to_string(), "10.0.0.1:53");

        let v6 = FlowEndpoint::new("2001:db8::1".parse().unwrap(), 53);
        assert_eq!(v6.to_string(), "[2001:db8::1]:53");
    }
}
