//! # Core Codec Components
//!
//! Byte buffers, primitive encoding, and packet framing.
//!
//! This module provides the foundation for the protocol: everything below the level
//! of individual packet layouts.
//!
//! ## Components
//! - **Cursor**: bounds-checked read buffer with append-only writes
//! - **Primitives**: integers, floats, varints, strings, flag bytes, counted lists
//! - **Frame**: header validation and gzip body wrapping
//! - **Codec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Type(2)] [Length(4)] [Gzip body(Length)]
//! ```
//!
//! ## Safety
//! - Maximum body size: 16KB, 256KB for beatmap info requests
//! - Length validation before allocation
//! - Decompressed output capped at the same limit

pub mod codec;
pub mod cursor;
pub mod frame;
pub mod primitives;
