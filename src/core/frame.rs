//! # Frame Layer
//!
//! Splits a byte stream into frames and wraps encoded payloads back into frames.
//!
//! ```text
//! [Type(2)] [Length(4)] [Gzip body(Length)]
//! ```
//!
//! Header fields are little-endian. The header is validated (known id, direction
//! matches the reader role, length within the packet type's limit) before any body
//! byte is touched, so an oversized frame is rejected without being buffered.

use crate::config::HEADER_SIZE;
use crate::core::cursor::ByteCursor;
use crate::error::{ProtocolError, Result};
use crate::protocol::packet_type::{PacketType, Role};
use crate::utils::compression::{maybe_compress, maybe_decompress, DecompressError};

/// Validated frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub packet: PacketType,
    /// Length of the compressed body that follows
    pub length: usize,
}

impl FrameHeader {
    /// Parse a header addressed to `role`.
    ///
    /// # Errors
    /// - `BoundsViolation` if `bytes` is shorter than a header
    /// - `UnknownPacket` for an unassigned id
    /// - `DirectionMismatch` if `role` may not read the packet
    /// - `OversizedPacket` if the declared length exceeds the packet's limit
    pub fn parse(bytes: &[u8], role: Role) -> Result<Self> {
        let header: [u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(ProtocolError::BoundsViolation {
                requested: HEADER_SIZE,
                available: bytes.len(),
            })?;

        let id = u16::from_le_bytes([header[0], header[1]]);
        let packet = PacketType::from_id(id).ok_or(ProtocolError::UnknownPacket(id))?;
        if !packet.readable_by(role) {
            return Err(ProtocolError::DirectionMismatch { packet, role });
        }

        let length = declared_length(&header);
        check_size(packet, length)?;

        Ok(Self { packet, length })
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..2].copy_from_slice(&self.packet.id().to_le_bytes());
        out[2..].copy_from_slice(&(self.length as u32).to_le_bytes());
        out
    }
}

/// Body length a raw header declares, valid or not
pub fn declared_length(header: &[u8; HEADER_SIZE]) -> usize {
    u32::from_le_bytes([header[2], header[3], header[4], header[5]]) as usize
}

/// Advance past a frame whose header was rejected
fn skip_rejected(cursor: &mut ByteCursor, length: usize) {
    let skip = if cursor.remaining() >= HEADER_SIZE + length {
        HEADER_SIZE + length
    } else {
        HEADER_SIZE
    };
    let _ = cursor.read(skip);
}

/// Reject lengths past the packet's limit. The limit itself is allowed.
pub fn check_size(packet: PacketType, length: usize) -> Result<()> {
    let limit = packet.max_size();
    if length > limit {
        return Err(ProtocolError::OversizedPacket {
            packet,
            length,
            limit,
        });
    }
    Ok(())
}

/// Uncompressed payload bytes of one packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub packet: PacketType,
    pub bytes: Vec<u8>,
}

/// Gzip wrapping of frame bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionFramer {
    level: u32,
    enabled: bool,
}

impl CompressionFramer {
    pub fn new(level: u32, enabled: bool) -> Self {
        Self { level, enabled }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Take one frame from `cursor` and decompress its body.
    ///
    /// A header or frame that is not fully buffered yields `BoundsViolation` and
    /// consumes nothing. Every other error steps past the frame: a rejected header
    /// consumes the header, plus the declared body when it is fully buffered.
    pub fn read_frame(&self, cursor: &mut ByteCursor, role: Role) -> Result<RawPacket> {
        let bytes: [u8; HEADER_SIZE] = cursor
            .peek(HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(ProtocolError::BoundsViolation {
                requested: HEADER_SIZE,
                available: cursor.remaining(),
            })?;

        let header = match FrameHeader::parse(&bytes, role) {
            Ok(header) => header,
            Err(error) => {
                skip_rejected(cursor, declared_length(&bytes));
                return Err(error);
            }
        };

        let total = HEADER_SIZE + header.length;
        if cursor.remaining() < total {
            return Err(ProtocolError::BoundsViolation {
                requested: total,
                available: cursor.remaining(),
            });
        }

        cursor.read(HEADER_SIZE)?;
        let body = cursor.read(header.length)?;
        self.unwrap_body(header, body)
    }

    /// Decompress a body whose header has already been validated
    pub fn unwrap_body(&self, header: FrameHeader, body: &[u8]) -> Result<RawPacket> {
        let limit = header.packet.max_size();
        let bytes = maybe_decompress(body, limit, self.enabled).map_err(|e| match e {
            DecompressError::Corrupt => ProtocolError::DecompressionFailure,
            DecompressError::TooLarge(length) => ProtocolError::OversizedPacket {
                packet: header.packet,
                length,
                limit,
            },
        })?;

        Ok(RawPacket {
            packet: header.packet,
            bytes,
        })
    }

    /// Compress `raw` and append header and body to `out`.
    ///
    /// Frames a peer would reject for size are refused instead of written. Returns
    /// the compressed body length.
    pub fn write_frame(&self, raw: &RawPacket, out: &mut ByteCursor) -> Result<usize> {
        let frame = self.encode_frame(raw)?;
        out.write(&frame);
        Ok(frame.len() - HEADER_SIZE)
    }

    /// Build a complete frame in a fresh buffer
    pub fn encode_frame(&self, raw: &RawPacket) -> Result<Vec<u8>> {
        check_size(raw.packet, raw.bytes.len())?;
        let body = maybe_compress(&raw.bytes, self.level, self.enabled)?;
        check_size(raw.packet, body.len())?;

        let header = FrameHeader {
            packet: raw.packet,
            length: body.len(),
        };

        let mut frame = Vec::with_capacity(HEADER_SIZE + body.len());
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(&body);
        Ok(frame)
    }
}
