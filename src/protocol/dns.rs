//! DNS message decoding.
//!
//! Decodes the 12-byte header and the first question of a DNS message. The
//! parser is deliberately soft: a payload that is not plausibly DNS (no
//! question, name running outside the message, section counts the remaining
//! bytes cannot hold) yields `None` instead of an error, and the packet is
//! simply excluded from analysis.

/// DNS well-known port.
pub const DNS_PORT: u16 = 53;

/// Maximum compression-pointer jumps before a name is considered malicious.
const MAX_POINTER_JUMPS: usize = 10;

/// Maximum labels in a single name.
const MAX_LABELS: usize = 128;

/// DNS record types.
pub mod record_type {
    pub const A: u16 = 1;
    pub const NS: u16 = 2;
    pub const CNAME: u16 = 5;
    pub const SOA: u16 = 6;
    pub const PTR: u16 = 12;
    pub const MX: u16 = 15;
    pub const TXT: u16 = 16;
    pub const AAAA: u16 = 28;
    pub const SRV: u16 = 33;
    pub const ANY: u16 = 255;
}

/// DNS response codes.
#[allow(dead_code)]
pub mod rcode {
    pub const NOERROR: u8 = 0;
    pub const FORMERR: u8 = 1;
    pub const SERVFAIL: u8 = 2;
    pub const NXDOMAIN: u8 = 3;
    pub const NOTIMP: u8 = 4;
    pub const REFUSED: u8 = 5;
}

/// Symbolic name for a question type.
///
/// Unrecognized codes keep a numeric label rather than being dropped.
pub fn qtype_name(qtype: u16) -> String {
    match qtype {
        record_type::A => "A".to_string(),
        record_type::NS => "NS".to_string(),
        record_type::CNAME => "CNAME".to_string(),
        record_type::SOA => "SOA".to_string(),
        record_type::PTR => "PTR".to_string(),
        record_type::MX => "MX".to_string(),
        record_type::TXT => "TXT".to_string(),
        record_type::AAAA => "AAAA".to_string(),
        record_type::SRV => "SRV".to_string(),
        record_type::ANY => "ANY".to_string(),
        other => format!("TYPE{other}"),
    }
}

/// A decoded DNS message: header fields, the first question, and the wire
/// length the message occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub transaction_id: u16,
    /// QR flag bit: false = query, true = response
    pub is_response: bool,
    pub opcode: u8,
    pub response_code: u8,
    pub question_count: u16,
    pub answer_count: u16,
    /// Name of the first question
    pub query_name: String,
    /// Type of the first question
    pub qtype: u16,
    pub qclass: u16,
    /// Total message length on the wire, in bytes
    pub wire_len: usize,
}

impl DnsMessage {
    /// Decode a DNS message from a UDP payload.
    ///
    /// Returns `None` when the payload is not plausibly DNS.
    pub fn parse(data: &[u8]) -> Option<Self> {
        // Header is 12 bytes minimum
        if data.len() < 12 {
            return None;
        }

        let transaction_id = u16::from_be_bytes([data[0], data[1]]);
        let flags = u16::from_be_bytes([data[2], data[3]]);

        let is_response = (flags & 0x8000) != 0;
        let opcode = ((flags >> 11) & 0x0F) as u8;
        let response_code = (flags & 0x000F) as u8;

        let question_count = u16::from_be_bytes([data[4], data[5]]);
        let answer_count = u16::from_be_bytes([data[6], data[7]]);
        let authority_count = u16::from_be_bytes([data[8], data[9]]);
        let additional_count = u16::from_be_bytes([data[10], data[11]]);

        // A message with nothing asked is not usable traffic here
        if question_count == 0 {
            return None;
        }

        let (query_name, after_name) = parse_name(data, 12)?;

        // QTYPE (2) and QCLASS (2) follow the name
        if data.len() < after_name + 4 {
            return None;
        }
        let qtype = u16::from_be_bytes([data[after_name], data[after_name + 1]]);
        let qclass = u16::from_be_bytes([data[after_name + 2], data[after_name + 3]]);
        let after_question = after_name + 4;

        // Plausibility check on the declared section counts: every further
        // question needs at least 5 bytes (root name + type + class), every
        // record at least 11 (root name + fixed RR fields).
        let extra_questions = (question_count as usize - 1) * 5;
        let records =
            (answer_count as usize + authority_count as usize + additional_count as usize) * 11;
        if data.len() < after_question + extra_questions + records {
            return None;
        }

        Some(DnsMessage {
            transaction_id,
            is_response,
            opcode,
            response_code,
            question_count,
            answer_count,
            query_name,
            qtype,
            qclass,
            wire_len: data.len(),
        })
    }

    /// Decode a DNS message from a TCP payload.
    ///
    /// DNS over TCP prefixes each message with a 2-byte length. Only the
    /// first message of the segment is considered; the prefix must be fully
    /// contained in the segment.
    pub fn parse_tcp(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }
        let msg_len = u16::from_be_bytes([data[0], data[1]]) as usize;
        let message = data.get(2..2 + msg_len)?;
        Self::parse(message)
    }

    /// Symbolic name for this message's question type.
    pub fn qtype_name(&self) -> String {
        qtype_name(self.qtype)
    }
}

/// Parse a domain name starting at `start`, following compression pointers.
///
/// `data` is the whole message so pointer offsets (which are relative to the
/// message start) resolve. Returns the dotted name and the offset of the
/// first byte after the name's in-place encoding.
fn parse_name(data: &[u8], start: usize) -> Option<(String, usize)> {
    let mut name_parts: Vec<String> = Vec::with_capacity(4);
    let mut pos = start;
    let mut after = None; // set at the first pointer
    let mut jumps = 0;

    loop {
        let len = *data.get(pos)? as usize;

        if len == 0 {
            pos += 1;
            break;
        }

        // Compression pointer: top two bits set, 14-bit offset follows
        if (len & 0xC0) == 0xC0 {
            let low = *data.get(pos + 1)? as usize;
            if after.is_none() {
                after = Some(pos + 2);
            }

            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return None;
            }

            let target = ((len & 0x3F) << 8) | low;
            // A pointer must reach backwards, or it can never terminate
            if target >= pos {
                return None;
            }
            pos = target;
            continue;
        }

        // RFC 1035: labels are at most 63 octets
        if len > 63 {
            return None;
        }

        let label = data.get(pos + 1..pos + 1 + len)?;
        match std::str::from_utf8(label) {
            Ok(s) => name_parts.push(s.to_string()),
            Err(_) => {
                // Non-UTF8 label, represent as hex
                name_parts.push(format!("[{len:02x}]"));
            }
        }
        pos += 1 + len;

        if name_parts.len() > MAX_LABELS {
            return None;
        }
    }

    let name = if name_parts.is_empty() {
        ".".to_string()
    } else {
        name_parts.join(".")
    };

    Some((name, after.unwrap_or(pos)))
}
