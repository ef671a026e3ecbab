//! Ethernet II link layer decoding.

use etherparse::Ethernet2HeaderSlice;

/// Well-known EtherType values (IEEE 802).
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const QINQ: u16 = 0x88A8;
}

/// Decoded Ethernet header: the ethertype that selects the network layer
/// and the offset where that layer starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub ethertype: u16,
    pub header_len: usize,
}

impl EthernetHeader {
    /// Decode an Ethernet II header, skipping a single 802.1Q VLAN tag if
    /// present so tagged traffic is not dropped.
    ///
    /// Returns `None` for frames too short to carry the header.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let eth = Ethernet2HeaderSlice::from_slice(data).ok()?;
        let mut ethertype = eth.ether_type().0;
        let mut header_len = eth.slice().len();

        if ethertype == ethertype::VLAN || ethertype == ethertype::QINQ {
            // 802.1Q tag: 2 bytes TCI + 2 bytes inner ethertype
            let tag = data.get(header_len..header_len + 4)?;
            ethertype = u16::from_be_bytes([tag[2], tag[3]]);
            header_len += 4;
        }

        Some(EthernetHeader {
            ethertype,
            header_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ipv4_frame() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst MAC
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // src MAC
            0x08, 0x00, // ethertype: IPv4
        ];

        let eth = EthernetHeader::decode(&frame).unwrap();
        assert_eq!(eth.ethertype, ethertype::IPV4);
        assert_eq!(eth.header_len, 14);
    }

    #[test]
    fn test_decode_vlan_tagged_frame() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst MAC
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // src MAC
            0x81, 0x00, // ethertype: 802.1Q
            0x00, 0x64, // TCI: VLAN 100
            0x08, 0x00, // inner ethertype: IPv4
        ];

        let eth = EthernetHeader::decode(&frame).unwrap();
        assert_eq!(eth.ethertype, ethertype::IPV4);
        assert_eq!(eth.header_len, 18);
    }

    #[test]
    fn test_decode_too_short() {
        let frame = [0xff, 0xff, 0xff, 0xff];
        assert!(EthernetHeader::decode(&frame).is_none());
    }

    #[test]
    fn test_decode_truncated_vlan_tag() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst MAC
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // src MAC
            0x81, 0x00, // ethertype: 802.1Q
            0x00, // tag cut off
        ];
        assert!(EthernetHeader::decode(&frame).is_none());
    }

    #[test]
    fn test_decode_arp_frame() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, //
            0x08, 0x06, // ethertype: ARP
        ];

        let eth = EthernetHeader::decode(&frame).unwrap();
        assert_eq!(eth.ethertype, ethertype::ARP);
    }
}
