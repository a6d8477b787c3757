use crate::error::{ProtocolError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compresses data into a gzip stream at the given level (0-9)
///
/// The gzip header carries no timestamp or file name, so output is deterministic.
///
/// # Errors
/// Returns `ProtocolError::CompressionFailure` if compression fails
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 2 + 32),
        Compression::new(level.min(9)),
    );
    encoder
        .write_all(data)
        .map_err(|_| ProtocolError::CompressionFailure)?;
    encoder.finish().map_err(|_| ProtocolError::CompressionFailure)
}

/// Decompresses a complete gzip stream
///
/// Enforces a maximum output size to prevent decompression bombs. The caller passes
/// the limit of the packet type being decoded.
///
/// # Errors
/// - [`DecompressError::Corrupt`] if the stream is corrupt or truncated
/// - [`DecompressError::TooLarge`] if output grows past `max_size`
pub fn decompress(data: &[u8], max_size: usize) -> std::result::Result<Vec<u8>, DecompressError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();

    // Read in chunks to enforce size limit
    let mut buffer = [0u8; 8192];
    loop {
        match decoder.read(&mut buffer) {
            Ok(0) => break, // EOF
            Ok(n) => {
                out.extend_from_slice(&buffer[..n]);
                // Check size limit on each chunk
                if out.len() > max_size {
                    return Err(DecompressError::TooLarge(out.len()));
                }
            }
            Err(_) => return Err(DecompressError::Corrupt),
        }
    }
    Ok(out)
}

/// Why a gzip body could not be unpacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// Truncated or corrupt stream
    Corrupt,
    /// Output grew past the limit; carries the size reached when decoding stopped
    TooLarge(usize),
}

/// Compress data unless compression is disabled, otherwise return it unchanged.
pub fn maybe_compress(data: &[u8], level: u32, enabled: bool) -> Result<Vec<u8>> {
    if enabled {
        compress(data, level)
    } else {
        Ok(data.to_vec())
    }
}

/// Decompress data only if compression is enabled; otherwise return as-is.
pub fn maybe_decompress(
    data: &[u8],
    max_size: usize,
    enabled: bool,
) -> std::result::Result<Vec<u8>, DecompressError> {
    if enabled {
        decompress(data, max_size)
    } else if data.len() > max_size {
        Err(DecompressError::TooLarge(data.len()))
    } else {
        Ok(data.to_vec())
    }
}
