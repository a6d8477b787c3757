//! Diagnostics and Metrics
//!
//! Codec operations report what they decoded, encoded, and rejected to a
//! [`DiagnosticSink`] injected into each protocol variant. Nothing is global: two
//! variants built with different sinks never observe each other's traffic.
//!
//! - [`TracingSink`] (default) emits structured `tracing` events
//! - [`Metrics`] keeps atomic counters for export
//! - [`NoopSink`] discards everything

use crate::config::LoggingConfig;
use crate::error::ProtocolError;
use crate::protocol::packet_type::PacketType;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, Level};

/// Receiver for codec diagnostics
///
/// Implementations must be cheap: they run on every packet.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    fn packet_read(&self, version: u32, packet: PacketType, length: usize);

    fn packet_written(&self, version: u32, packet: PacketType, length: usize);

    fn read_failed(&self, version: u32, error: &ProtocolError);

    fn write_failed(&self, version: u32, error: &ProtocolError);
}

/// Emit a tracing event at a level chosen at runtime
macro_rules! event_at {
    ($level:expr, $($rest:tt)+) => {{
        let level: Level = $level;
        if level == Level::TRACE {
            tracing::event!(Level::TRACE, $($rest)+)
        } else if level == Level::DEBUG {
            tracing::event!(Level::DEBUG, $($rest)+)
        } else if level == Level::INFO {
            tracing::event!(Level::INFO, $($rest)+)
        } else if level == Level::WARN {
            tracing::event!(Level::WARN, $($rest)+)
        } else {
            tracing::event!(Level::ERROR, $($rest)+)
        }
    }};
}

/// Logs codec activity through `tracing`
#[derive(Debug, Clone)]
pub struct TracingSink {
    log_packets: bool,
    packet_level: Level,
    error_level: Level,
}

impl TracingSink {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            log_packets: config.log_packets,
            packet_level: config.packet_level,
            error_level: config.error_level,
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(&LoggingConfig::default())
    }
}

impl DiagnosticSink for TracingSink {
    fn packet_read(&self, version: u32, packet: PacketType, length: usize) {
        if self.log_packets {
            event_at!(self.packet_level, version, %packet, length, "Packet decoded");
        }
    }

    fn packet_written(&self, version: u32, packet: PacketType, length: usize) {
        if self.log_packets {
            event_at!(self.packet_level, version, %packet, length, "Packet encoded");
        }
    }

    fn read_failed(&self, version: u32, error: &ProtocolError) {
        event_at!(self.error_level, version, %error, "Packet decode failed");
    }

    fn write_failed(&self, version: u32, error: &ProtocolError) {
        event_at!(self.error_level, version, %error, "Packet encode failed");
    }
}

/// Discards every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn packet_read(&self, _: u32, _: PacketType, _: usize) {}

    fn packet_written(&self, _: u32, _: PacketType, _: usize) {}

    fn read_failed(&self, _: u32, _: &ProtocolError) {}

    fn write_failed(&self, _: u32, _: &ProtocolError) {}
}

/// Counters for codec traffic
#[derive(Debug)]
pub struct Metrics {
    /// Packets decoded successfully
    pub packets_read: AtomicU64,
    /// Packets encoded successfully
    pub packets_written: AtomicU64,
    /// Payload bytes decoded
    pub bytes_read: AtomicU64,
    /// Compressed body bytes encoded
    pub bytes_written: AtomicU64,
    /// Failed decodes of any kind
    pub read_errors: AtomicU64,
    /// Failed encodes of any kind
    pub write_errors: AtomicU64,
    /// Frames rejected for their declared or decompressed size
    pub oversized_rejected: AtomicU64,
    /// Corrupt or truncated gzip bodies
    pub decompression_failures: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            packets_read: AtomicU64::new(0),
            packets_written: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            read_errors: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            oversized_rejected: AtomicU64::new(0),
            decompression_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_read: self.packets_read.load(Ordering::Relaxed),
            packets_written: self.packets_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            oversized_rejected: self.oversized_rejected.load(Ordering::Relaxed),
            decompression_failures: self.decompression_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_read = snapshot.packets_read,
            packets_written = snapshot.packets_written,
            bytes_read = snapshot.bytes_read,
            bytes_written = snapshot.bytes_written,
            read_errors = snapshot.read_errors,
            write_errors = snapshot.write_errors,
            oversized_rejected = snapshot.oversized_rejected,
            decompression_failures = snapshot.decompression_failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }

    fn record_error(&self, error: &ProtocolError) {
        match error {
            ProtocolError::OversizedPacket { .. } => {
                self.oversized_rejected.fetch_add(1, Ordering::Relaxed);
            }
            ProtocolError::DecompressionFailure => {
                self.decompression_failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for Metrics {
    fn packet_read(&self, _version: u32, _packet: PacketType, length: usize) {
        self.packets_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(length as u64, Ordering::Relaxed);
    }

    fn packet_written(&self, _version: u32, _packet: PacketType, length: usize) {
        self.packets_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(length as u64, Ordering::Relaxed);
    }

    fn read_failed(&self, _version: u32, error: &ProtocolError) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
        self.record_error(error);
    }

    fn write_failed(&self, _version: u32, error: &ProtocolError) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
        self.record_error(error);
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub packets_read: u64,
    pub packets_written: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub read_errors: u64,
    pub write_errors: u64,
    pub oversized_rejected: u64,
    pub decompression_failures: u64,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_count_traffic() {
        let metrics = Metrics::new();
        metrics.packet_read(282, PacketType::OsuPong, 20);
        metrics.packet_written(282, PacketType::BanchoPing, 20);
        metrics.packet_written(282, PacketType::BanchoPing, 22);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_read, 1);
        assert_eq!(snapshot.packets_written, 2);
        assert_eq!(snapshot.bytes_written, 42);
    }

    #[test]
    fn test_metrics_classify_errors() {
        let metrics = Metrics::new();
        metrics.read_failed(
            490,
            &ProtocolError::OversizedPacket {
                packet: PacketType::OsuMessage,
                length: 1 << 15,
                limit: 1 << 14,
            },
        );
        metrics.read_failed(490, &ProtocolError::DecompressionFailure);
        metrics.read_failed(490, &ProtocolError::UnknownPacket(45));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.read_errors, 3);
        assert_eq!(snapshot.oversized_rejected, 1);
        assert_eq!(snapshot.decompression_failures, 1);
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        let sink = TracingSink::default();
        sink.packet_read(282, PacketType::OsuExit, 24);
        sink.read_failed(282, &ProtocolError::UnknownPacket(84));

        let metrics = Metrics::new();
        metrics.write_failed(282, &ProtocolError::CompressionFailure);
        metrics.log_metrics();
        assert_eq!(metrics.snapshot().write_errors, 1);
    }
}
