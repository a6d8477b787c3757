//! # Configuration Management
//!
//! Wire constants, per-revision variant settings, and the codec configuration
//! that callers load from TOML.
//!
//! ## Configuration Sources
//! - TOML files via `CodecConfig::from_file()`
//! - TOML strings via `CodecConfig::from_toml()`
//! - Direct instantiation with defaults
//!
//! [`VariantConfig`] is fixed per protocol revision and is never loaded from a file;
//! [`CodecConfig`] only chooses how a variant is driven (reader role, gzip level,
//! diagnostics).

use crate::error::{constants, ProtocolError, Result};
use crate::protocol::packet_type::Role;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Bytes consumed by a frame header: u16 packet id + u32 body length
pub const HEADER_SIZE: usize = 6;

/// Max allowed payload size for ordinary packets (16 KB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1 << 14;

/// Max allowed payload size for beatmap info requests (256 KB)
pub const LARGE_MAX_PAYLOAD_SIZE: usize = 1 << 18;

/// Marker byte preceding every non-empty string
pub const STRING_MARKER: u8 = 0x0B;

/// Sentinel byte encoding the empty string
pub const EMPTY_STRING: u8 = 0x00;

/// Default number of multiplayer match slots
pub const DEFAULT_SLOT_SIZE: usize = 8;

/// Default gzip compression level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Channels every client joins after login
pub const DEFAULT_AUTOJOIN_CHANNELS: [&str; 2] = ["#osu", "#announce"];

/// Fixed settings of one protocol revision.
///
/// Built once when a variant is constructed and only readable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    version: u32,
    slot_size: usize,
    header_size: usize,
    protocol_version: u32,
    disable_compression: bool,
    requires_status_updates: bool,
    autojoin_channels: Vec<String>,
}

impl VariantConfig {
    /// Settings shared by every currently supported revision
    pub fn new(version: u32) -> Self {
        Self {
            version,
            slot_size: DEFAULT_SLOT_SIZE,
            header_size: HEADER_SIZE,
            protocol_version: 0,
            disable_compression: false,
            requires_status_updates: true,
            autojoin_channels: DEFAULT_AUTOJOIN_CHANNELS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    pub fn header_size(&self) -> usize {
        self.header_size
    }

    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    pub fn disable_compression(&self) -> bool {
        self.disable_compression
    }

    pub fn requires_status_updates(&self) -> bool {
        self.requires_status_updates
    }

    pub fn autojoin_channels(&self) -> &[String] {
        &self.autojoin_channels
    }
}

/// Codec configuration: how a protocol variant is driven
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Which side of the connection this codec reads for
    #[serde(default)]
    pub role: Role,

    /// Gzip level used when compressing frame bodies (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Diagnostics configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            role: Role::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            logging: LoggingConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.compression_level > 9 {
            errors.push(format!(
                "{}: got {}",
                constants::ERR_INVALID_COMPRESSION_LEVEL,
                self.compression_level
            ));
        }

        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Diagnostics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit one event per packet read or written
    pub log_packets: bool,

    /// Level of per-packet events
    #[serde(with = "log_level_serde")]
    pub packet_level: Level,

    /// Level of decode/encode failure events
    #[serde(with = "log_level_serde")]
    pub error_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_packets: true,
            packet_level: Level::TRACE,
            error_level: Level::WARN,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Failures should never be quieter than the packets around them
        if self.log_packets && self.error_level > self.packet_level {
            errors.push(format!(
                "Error level ({}) is more verbose than packet level ({})",
                self.error_level, self.packet_level
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
