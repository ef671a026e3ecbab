//! Generic PCAP/PCAPNG frame reader over any `Read` source.
//!
//! Built on the `pcap_parser` crate. The reader is a finite, forward-only
//! producer: frames come out in capture order, `Ok(None)` marks end of
//! stream, and corrupt framing fails fast with a capture error.

use std::io::{BufReader, Read};

use bytes::Bytes;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapNGReader};

use crate::error::{Error, PcapError};
use crate::pcap::Frame;

/// Buffer size for pcap_parser readers (256KB). Large enough that a full
/// refill always holds any legacy record up to the 65535-byte snaplen.
const BUFFER_SIZE: usize = 262144;

/// Format of the capture container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcapFormat {
    /// Classic PCAP (little-endian, microseconds)
    LegacyLeMicro,
    /// Classic PCAP (big-endian, microseconds)
    LegacyBeMicro,
    /// Classic PCAP (little-endian, nanoseconds)
    LegacyLeNano,
    /// Classic PCAP (big-endian, nanoseconds)
    LegacyBeNano,
    /// PCAPNG format
    PcapNg,
}

impl PcapFormat {
    /// Detect the capture format from magic bytes.
    pub fn detect(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::Pcap(PcapError::InvalidFormat {
                reason: "data too small for PCAP magic".into(),
            }));
        }

        let magic = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);

        match magic {
            0xa1b2c3d4 => Ok(PcapFormat::LegacyLeMicro),
            0xd4c3b2a1 => Ok(PcapFormat::LegacyBeMicro),
            0xa1b23c4d => Ok(PcapFormat::LegacyLeNano),
            0x4d3cb2a1 => Ok(PcapFormat::LegacyBeNano),
            0x0a0d0d0a => Ok(PcapFormat::PcapNg),
            _ => Err(Error::Pcap(PcapError::InvalidFormat {
                reason: format!("unknown PCAP magic: 0x{:08x}", magic),
            })),
        }
    }

    /// Whether this is a PCAPNG format.
    pub fn is_pcapng(&self) -> bool {
        matches!(self, PcapFormat::PcapNg)
    }

    /// Whether this is a legacy PCAP format.
    pub fn is_legacy(&self) -> bool {
        !self.is_pcapng()
    }
}

/// Generic PCAP/PCAPNG frame reader over any `Read` source.
pub struct CaptureReader<R: Read> {
    inner: ReaderInner<R>,
    frame_number: u64,
    link_type: u16,
}

/// Inner reader using enum dispatch for format-specific handling.
enum ReaderInner<R: Read> {
    Legacy(LegacyPcapReader<BufReader<R>>),
    Ng(PcapNGReader<BufReader<R>>),
}

impl<R: Read> CaptureReader<R> {
    /// Create a reader with known format.
    ///
    /// Use [`PcapFormat::detect`] on the first bytes of the source to
    /// determine the format before calling this.
    pub fn with_format(source: R, format: PcapFormat) -> Result<Self, Error> {
        let buf_reader = BufReader::with_capacity(BUFFER_SIZE, source);

        let inner = if format.is_pcapng() {
            let reader = PcapNGReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("failed to parse PCAPNG: {}", e),
                })
            })?;
            ReaderInner::Ng(reader)
        } else {
            let reader = LegacyPcapReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("failed to parse legacy PCAP: {}", e),
                })
            })?;
            ReaderInner::Legacy(reader)
        };

        Ok(CaptureReader {
            inner,
            frame_number: 0,
            link_type: 1, // Default to Ethernet, updated from headers
        })
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        match &mut self.inner {
            ReaderInner::Legacy(reader) => {
                read_legacy_frame(reader, &mut self.frame_number, &mut self.link_type)
            }
            ReaderInner::Ng(reader) => {
                read_pcapng_frame(reader, &mut self.frame_number, &mut self.link_type)
            }
        }
    }

    /// Get the link type (e.g., 1 = Ethernet).
    pub fn link_type(&self) -> u16 {
        self.link_type
    }

    /// Get the number of frames read so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }
}

/// Read the next frame from a legacy PCAP reader.
fn read_legacy_frame<S: Read>(
    reader: &mut LegacyPcapReader<S>,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<Frame>, Error> {
    use pcap_parser::PcapError as PcapParserError;

    let mut stalled = false;
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                stalled = false;
                match block {
                    PcapBlockOwned::Legacy(packet) => {
                        *frame_number += 1;

                        let timestamp_us =
                            (packet.ts_sec as i64) * 1_000_000 + (packet.ts_usec as i64);

                        let frame = Frame {
                            frame_number: *frame_number,
                            timestamp_us,
                            captured_length: packet.caplen,
                            original_length: packet.origlen,
                            link_type: *link_type,
                            data: Bytes::copy_from_slice(packet.data),
                        };

                        reader.consume(offset);
                        return Ok(Some(frame));
                    }
                    PcapBlockOwned::LegacyHeader(header) => {
                        *link_type = header.network.0 as u16;
                        reader.consume(offset);
                        continue;
                    }
                    _ => {
                        reader.consume(offset);
                        continue;
                    }
                }
            }
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                // A second Incomplete with no block in between means the
                // refill could not make progress: a record claims more bytes
                // than the stream holds.
                if stalled {
                    return Err(Error::Pcap(PcapError::InvalidFormat {
                        reason: "record length exceeds remaining capture bytes".into(),
                    }));
                }
                stalled = true;
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("legacy PCAP refill error: {}", e),
                    })
                })?;
                continue;
            }
            Err(e) => {
                return Err(Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("legacy PCAP parse error: {}", e),
                }));
            }
        }
    }
}

/// Read the next frame from a PCAPNG reader.
fn read_pcapng_frame<S: Read>(
    reader: &mut PcapNGReader<S>,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<Frame>, Error> {
    use pcap_parser::PcapError as PcapParserError;

    let mut stalled = false;
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                stalled = false;
                match block {
                    PcapBlockOwned::NG(ng_block) => {
                        use pcap_parser::pcapng::Block;

                        match ng_block {
                            Block::InterfaceDescription(idb) => {
                                *link_type = idb.linktype.0 as u16;
                                reader.consume(offset);
                                continue;
                            }
                            Block::EnhancedPacket(epb) => {
                                *frame_number += 1;

                                let timestamp_us =
                                    ((epb.ts_high as i64) << 32) | (epb.ts_low as i64);

                                let frame = Frame {
                                    frame_number: *frame_number,
                                    timestamp_us,
                                    captured_length: epb.caplen,
                                    original_length: epb.origlen,
                                    link_type: *link_type,
                                    data: Bytes::copy_from_slice(epb.data),
                                };

                                reader.consume(offset);
                                return Ok(Some(frame));
                            }
                            Block::SimplePacket(spb) => {
                                *frame_number += 1;

                                let frame = Frame {
                                    frame_number: *frame_number,
                                    timestamp_us: 0,
                                    captured_length: spb.data.len() as u32,
                                    original_length: spb.origlen,
                                    link_type: *link_type,
                                    data: Bytes::copy_from_slice(spb.data),
                                };

                                reader.consume(offset);
                                return Ok(Some(frame));
                            }
                            _ => {
                                reader.consume(offset);
                                continue;
                            }
                        }
                    }
                    _ => {
                        reader.consume(offset);
                        continue;
                    }
                }
            }
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                if stalled {
                    return Err(Error::Pcap(PcapError::InvalidFormat {
                        reason: "block length exceeds remaining capture bytes".into(),
                    }));
                }
                stalled = true;
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("PCAPNG refill error: {}", e),
                    })
                })?;
                continue;
            }
            Err(e) => {
                return Err(Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("PCAPNG parse error: {}", e),
                }));
            }
        }
    }
}
