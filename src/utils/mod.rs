//! # Utility Modules
//!
//! Supporting utilities shared by the framing and protocol layers.
//!
//! ## Components
//! - **Compression**: gzip with an output size limit
//! - **Metrics**: diagnostic sinks (tracing, atomic counters, no-op)
//!
//! ## Safety
//! - Decompression bomb protection: output is capped at the packet type's limit

pub mod compression;
pub mod metrics;

pub use metrics::{DiagnosticSink, Metrics, MetricsSnapshot, NoopSink, TracingSink};
