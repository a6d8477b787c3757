//! Maps client build numbers to protocol revisions.
//!
//! A client speaks the newest revision whose version does not exceed its own build
//! number. Builds older than the first revision are not supported.

use crate::error::{ProtocolError, Result};
use crate::protocol::variant::{ClientInfo, ProtocolVariant, Revision};
use crate::protocol::{b282, b490};

/// Every supported revision, oldest first
pub static REVISIONS: [&Revision; 2] = [&b282::REVISION, &b490::REVISION];

/// Variant for a client reporting build `version`
pub fn select_client(version: i64) -> Result<ProtocolVariant> {
    REVISIONS
        .iter()
        .rev()
        .find(|revision| i64::from(revision.version) <= version)
        .map(|revision| ProtocolVariant::new(*revision))
        .ok_or(ProtocolError::UnsupportedProtocolVersion(version))
}

/// Newest supported revision
pub fn select_latest_client() -> ProtocolVariant {
    ProtocolVariant::new(&b490::REVISION)
}

/// Oldest supported revision
pub fn select_initial_client() -> ProtocolVariant {
    ProtocolVariant::new(&b282::REVISION)
}

/// Versions with their own revision, ascending
pub fn supported_versions() -> Vec<u32> {
    REVISIONS.iter().map(|revision| revision.version).collect()
}

/// Whether `version` names a revision exactly
pub fn is_version_supported(version: i64) -> bool {
    REVISIONS
        .iter()
        .any(|revision| i64::from(revision.version) == version)
}

pub fn client_info() -> Vec<ClientInfo> {
    REVISIONS
        .iter()
        .map(|revision| ClientInfo::from(*revision))
        .collect()
}
