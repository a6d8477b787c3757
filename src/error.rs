//! # Error Types
//!
//! Error handling for every codec operation.
//!
//! Each failure the codec can produce maps to exactly one variant of
//! [`ProtocolError`]. All failures are deterministic for a given input, so nothing in
//! the crate retries; callers (transport or session layers) decide whether a failed
//! decode terminates a connection.
//!
//! ## Error Categories
//! - **Buffer Errors**: reads past the end of the available bytes
//! - **Framing Errors**: unknown ids, wrong direction, oversized frames
//! - **Compression Errors**: corrupt or truncated gzip bodies
//! - **Revision Errors**: packets a protocol revision does not implement
//! - **Caller Errors**: mismatched payloads, out-of-range values, bad versions
//!
//! ## Example Usage
//! ```rust
//! use bancho_protocol::core::cursor::ByteCursor;
//! use bancho_protocol::error::{ProtocolError, Result};
//! use tracing::error;
//!
//! fn first_byte(data: &[u8]) -> Result<u8> {
//!     let mut cursor = ByteCursor::from(data);
//!     cursor.read_u8()
//! }
//!
//! match first_byte(&[]) {
//!     Err(ProtocolError::BoundsViolation { .. }) => {}
//!     other => error!(?other, "Expected a bounds violation"),
//! }
//! ```

use crate::protocol::packet_type::{PacketType, Role};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Primitive codec errors
    pub const ERR_BOOL_LIST_TOO_LONG: &str = "bool list too long (max 8)";
    pub const ERR_VARINT_TOO_LONG: &str = "varint exceeds 64 bits";
    pub const ERR_INVALID_UTF8: &str = "string is not valid UTF-8";
    pub const ERR_NEGATIVE_COUNT: &str = "list count is negative";

    /// Configuration errors
    pub const ERR_INVALID_COMPRESSION_LEVEL: &str = "Compression level must be between 0 and 9";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Attempt to read {requested} bytes with only {available} available")]
    BoundsViolation { requested: usize, available: usize },

    #[error("Packet '{packet}' is not valid for a {role} reader")]
    DirectionMismatch { packet: PacketType, role: Role },

    #[error("Unknown packet id: {0}")]
    UnknownPacket(u16),

    #[error("Packet '{packet}' with length {length} exceeds limit of {limit} bytes")]
    OversizedPacket {
        packet: PacketType,
        length: usize,
        limit: usize,
    },

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Version {version} does not implement packet '{packet}'")]
    UnimplementedForRevision { packet: PacketType, version: u32 },

    #[error("Payload for '{actual}' cannot be written as '{expected}'")]
    InvalidPayloadVariant {
        expected: PacketType,
        actual: PacketType,
    },

    #[error("Unsupported client version: {0}")]
    UnsupportedProtocolVersion(i64),

    #[error("Value out of encodable range: {0}")]
    EncodingRangeViolation(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
