//! # Protocol Layer
//!
//! Packet taxonomy, typed payloads, and the versioned revisions that encode them.
//!
//! ## Components
//! - **Packet types**: identifiers, directions, size limits
//! - **Payload**: one typed variant per implemented packet
//! - **Variant**: revision chains bound to a role and diagnostics
//! - **Revisions**: b282 (base) and b490 (derived)
//! - **Selector**: client build number to revision
//!
//! ## Revision Chain
//! ```text
//! b490 --parent--> b282
//!  |                |
//!  status layout    every packet rule
//!  beatmap info     status layout
//! ```

pub mod b282;
pub mod b490;
pub mod packet_type;
pub mod payload;
pub mod selector;
pub mod variant;

pub use packet_type::{Direction, PacketType, Role};
pub use payload::Payload;
pub use selector::{
    client_info, is_version_supported, select_client, select_initial_client,
    select_latest_client, supported_versions,
};
pub use variant::{ClientInfo, PacketBatch, ProtocolVariant};
