//! In-memory read/write buffer with a read cursor.
//!
//! Reads are bounds-checked and never grow the buffer; writes always append and
//! never fail. The cursor knows nothing about packets: framing and the primitive
//! codec (see [`crate::core::primitives`]) are layered on top of it.

use crate::error::{ProtocolError, Result};
use bytes::{Bytes, BytesMut};

/// Growable byte buffer with a read position.
///
/// A cursor is owned by exactly one in-flight operation or one connection
/// buffer; the codec never shares one between concurrent operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buffer: BytesMut,
    position: usize,
}

impl ByteCursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cursor with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            position: 0,
        }
    }

    /// Return the next `n` bytes and advance past them.
    ///
    /// # Errors
    /// Returns `ProtocolError::BoundsViolation` if fewer than `n` bytes remain;
    /// the cursor does not move in that case.
    pub fn read(&mut self, n: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if n > available {
            return Err(ProtocolError::BoundsViolation {
                requested: n,
                available,
            });
        }

        let start = self.position;
        self.position += n;
        Ok(&self.buffer[start..self.position])
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Return every unread byte and advance to the end. Never fails.
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.position;
        self.position = self.buffer.len();
        &self.buffer[start..]
    }

    /// Look at the next `n` bytes without consuming them
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.buffer.get(self.position..self.position.checked_add(n)?)
    }

    /// Append bytes to the end of the buffer
    pub fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total buffered bytes, read or not
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Every buffered byte, including those already read
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Unread bytes, without consuming them
    pub fn unread(&self) -> &[u8] {
        &self.buffer[self.position..]
    }

    /// Consume the cursor, returning the whole buffer
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Drop all data and rewind
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.position = 0;
    }

    /// Discard bytes that have already been read.
    ///
    /// Long-lived connection buffers call this between batches so the buffer only
    /// holds the unread tail.
    pub fn compact(&mut self) {
        if self.position == 0 {
            return;
        }
        let _ = self.buffer.split_to(self.position);
        self.position = 0;
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(data: Vec<u8>) -> Self {
        Self {
            buffer: BytesMut::from(&data[..]),
            position: 0,
        }
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(data: &[u8]) -> Self {
        Self {
            buffer: BytesMut::from(data),
            position: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_read_advances_position() {
        let mut cursor = ByteCursor::from(&[1u8, 2, 3, 4][..]);
        assert_eq!(cursor.read(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_read_past_end_is_bounds_violation() {
        let mut cursor = ByteCursor::from(&[1u8, 2][..]);
        match cursor.read(3) {
            Err(ProtocolError::BoundsViolation {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("Unexpected result: {other:?}"),
        }
        // A failed read leaves the cursor where it was
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_remaining_never_fails() {
        let mut cursor = ByteCursor::from(&[9u8, 8, 7][..]);
        assert_eq!(cursor.read_remaining(), &[9, 8, 7]);
        assert!(cursor.read_remaining().is_empty());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_write_appends_after_reads() {
        let mut cursor = ByteCursor::from(&[1u8][..]);
        cursor.read(1).unwrap();
        cursor.write(&[2, 3]);
        assert_eq!(cursor.as_bytes(), &[1, 2, 3]);
        assert_eq!(cursor.unread(), &[2, 3]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_compact_drops_consumed_bytes() {
        let mut cursor = ByteCursor::from(&[1u8, 2, 3][..]);
        cursor.read(2).unwrap();
        cursor.compact();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.as_bytes(), &[3]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = ByteCursor::from(&[5u8, 6][..]);
        assert_eq!(cursor.peek(2), Some(&[5u8, 6][..]));
        assert_eq!(cursor.peek(3), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_into_bytes_keeps_consumed_prefix() {
        let mut cursor = ByteCursor::from(vec![1u8, 2, 3]);
        cursor.read_remaining();
        assert_eq!(&cursor.into_bytes()[..], &[1, 2, 3]);
    }
}
