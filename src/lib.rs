//! # bancho-protocol
//!
//! Versioned codec for the legacy Bancho game-server wire protocol.
//!
//! Turns byte streams into typed packets and back across historical protocol
//! revisions that lay out the same packet identifiers differently. Revisions form an
//! explicit delegation chain: a derived revision restates only the packets (and the
//! user status fragment) whose layout changed, and inherits everything else.
//!
//! ## Layers
//! - [`core`]: byte cursor, primitive codec, frame header and gzip body handling,
//!   Tokio codec
//! - [`protocol`]: packet types, typed payloads, revisions, version selection
//! - [`types`]: enumerations and data holders carried in payloads
//! - [`utils`]: compression and diagnostic sinks
//! - [`config`]: wire constants, per-revision settings, codec configuration
//!
//! ## Example
//! ```rust
//! use bancho_protocol::core::cursor::ByteCursor;
//! use bancho_protocol::protocol::{Payload, Role};
//! use bancho_protocol::{read_packet, select_client, write_packet};
//!
//! let server = select_client(490)?;
//! let client = select_client(490)?.with_role(Role::Client);
//!
//! let mut wire = ByteCursor::new();
//! write_packet(&server, &mut wire, Payload::Ping.packet_type(), &Payload::Ping)?;
//!
//! let (packet, payload) = read_packet(&client, &mut wire)?;
//! assert_eq!(payload, Payload::Ping);
//! # let _ = packet;
//! # Ok::<(), bancho_protocol::error::ProtocolError>(())
//! ```
//!
//! The crate emits `tracing` events but never installs a subscriber.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod types;
pub mod utils;

use crate::core::cursor::ByteCursor;
use crate::error::Result;
use crate::protocol::packet_type::PacketType;
use crate::protocol::payload::Payload;

pub use crate::protocol::selector::{
    client_info, is_version_supported, select_client, select_initial_client,
    select_latest_client, supported_versions,
};
pub use crate::protocol::variant::{PacketBatch, ProtocolVariant};

/// Read one frame from `cursor` with `variant`
pub fn read_packet(
    variant: &ProtocolVariant,
    cursor: &mut ByteCursor,
) -> Result<(PacketType, Payload)> {
    variant.read_packet(cursor)
}

/// Append one frame carrying `payload` as `packet`
pub fn write_packet(
    variant: &ProtocolVariant,
    cursor: &mut ByteCursor,
    packet: PacketType,
    payload: &Payload,
) -> Result<()> {
    variant.write_packet(cursor, packet, payload)
}

/// Decode every complete frame in `data`
pub fn read_many_packets(variant: &ProtocolVariant, data: &[u8]) -> PacketBatch {
    variant.read_many(data)
}

/// Encode each payload as its own frame, concatenated
pub fn write_many_packets(variant: &ProtocolVariant, payloads: &[Payload]) -> Result<Vec<u8>> {
    variant.write_many(payloads)
}
