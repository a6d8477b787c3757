//! # Primitive Codec
//!
//! Scalar encoders and decoders layered on [`ByteCursor`].
//!
//! ## Wire Rules
//! - Every multi-byte integer and float is little-endian.
//! - Integer writes clamp out-of-range input to the nearest representable bound
//!   instead of wrapping; reads reinterpret the raw bytes as-is.
//! - Booleans are one byte: any nonzero byte reads as `true`, writes emit 0 or 1.
//! - Strings use a marker byte: `0x00` for the empty string, otherwise
//!   `0x0B ++ uleb128(len) ++ utf8`.
//!
//! ```text
//! ""   -> [0x00]
//! "hi" -> [0x0B, 0x02, b'h', b'i']
//! ```

use crate::config::{EMPTY_STRING, STRING_MARKER};
use crate::core::cursor::ByteCursor;
use crate::error::{constants, ProtocolError, Result};

/// Maximum number of flags a bool list byte can hold
pub const MAX_BOOL_LIST_LEN: usize = 8;

/// Clamp a wide integer into the range of `T`
macro_rules! clamp_to {
    ($value:expr, $ty:ty) => {{
        let value: i128 = $value.into();
        value.clamp(<$ty>::MIN as i128, <$ty>::MAX as i128) as $ty
    }};
}

impl ByteCursor {
    pub fn read_s8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(u8::from_le_bytes(self.read_array()?))
    }

    pub fn read_s16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_s32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_s64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read an unsigned LEB128 varint
    ///
    /// # Errors
    /// `MalformedPayload` if the encoding runs past 64 bits.
    pub fn read_uleb128(&mut self) -> Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;

        loop {
            let byte = self.read_u8()?;
            if shift > 63 || (shift == 63 && byte & 0x7E != 0) {
                return Err(ProtocolError::MalformedPayload(
                    constants::ERR_VARINT_TOO_LONG.to_string(),
                ));
            }

            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        if self.read_u8()? == EMPTY_STRING {
            return Ok(String::new());
        }

        let length = self.read_uleb128()?;
        let length = usize::try_from(length).map_err(|_| ProtocolError::BoundsViolation {
            requested: usize::MAX,
            available: self.remaining(),
        })?;

        let bytes = self.read(length)?.to_vec();
        String::from_utf8(bytes)
            .map_err(|_| ProtocolError::MalformedPayload(constants::ERR_INVALID_UTF8.to_string()))
    }

    /// Unpack `size` flags from one byte, flag `i` at bit `i`. A size of 0 means 8.
    pub fn read_bool_list(&mut self, size: usize) -> Result<Vec<bool>> {
        let size = match size {
            0 => MAX_BOOL_LIST_LEN,
            n if n > MAX_BOOL_LIST_LEN => {
                return Err(ProtocolError::EncodingRangeViolation(format!(
                    "{}: requested {n}",
                    constants::ERR_BOOL_LIST_TOO_LONG
                )))
            }
            n => n,
        };

        let byte = self.read_u8()?;
        Ok((0..size).map(|i| (byte >> i) & 1 == 1).collect())
    }

    /// Read s32 elements behind an s32 count
    pub fn read_list_s32(&mut self) -> Result<Vec<i32>> {
        let count = self.read_s32()?;
        let count = usize::try_from(count).map_err(|_| {
            ProtocolError::MalformedPayload(format!("{}: {count}", constants::ERR_NEGATIVE_COUNT))
        })?;
        self.read_s32_elements(count)
    }

    /// Read s32 elements behind a u16 count
    pub fn read_list_s32_short(&mut self) -> Result<Vec<i32>> {
        let count = usize::from(self.read_u16()?);
        self.read_s32_elements(count)
    }

    /// Read s32 elements behind a u32 count
    pub fn read_list_s32_long(&mut self) -> Result<Vec<i32>> {
        let count = self.read_u32()? as usize;
        self.read_s32_elements(count)
    }

    /// Read strings behind a u32 count
    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        let count = self.read_u32()? as usize;
        // Every string occupies at least one byte
        let mut out = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    fn read_s32_elements(&mut self, count: usize) -> Result<Vec<i32>> {
        let mut out = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            out.push(self.read_s32()?);
        }
        Ok(out)
    }

    pub fn write_s8(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, i8).to_le_bytes());
    }

    pub fn write_u8(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, u8).to_le_bytes());
    }

    pub fn write_s16(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, i16).to_le_bytes());
    }

    pub fn write_u16(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, u16).to_le_bytes());
    }

    pub fn write_s32(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, i32).to_le_bytes());
    }

    pub fn write_u32(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, u32).to_le_bytes());
    }

    pub fn write_s64(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, i64).to_le_bytes());
    }

    pub fn write_u64(&mut self, value: impl Into<i128>) {
        self.write(&clamp_to!(value, u64).to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write(&[u8::from(value)]);
    }

    pub fn write_uleb128(&mut self, mut value: u64) {
        let mut out = [0u8; 10];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            out[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.write(&out[..len]);
    }

    pub fn write_string(&mut self, value: &str) {
        if value.is_empty() {
            self.write(&[EMPTY_STRING]);
            return;
        }

        self.write(&[STRING_MARKER]);
        self.write_uleb128(value.len() as u64);
        self.write(value.as_bytes());
    }

    /// Pack up to 8 flags into one byte
    ///
    /// # Errors
    /// `EncodingRangeViolation` if more than 8 flags are given.
    pub fn write_bool_list(&mut self, values: &[bool]) -> Result<()> {
        if values.len() > MAX_BOOL_LIST_LEN {
            return Err(ProtocolError::EncodingRangeViolation(format!(
                "{}: got {}",
                constants::ERR_BOOL_LIST_TOO_LONG,
                values.len()
            )));
        }

        let byte = values
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .fold(0u8, |acc, (i, _)| acc | (1 << i));
        self.write_u8(byte);
        Ok(())
    }

    pub fn write_list_s32(&mut self, values: &[i32]) {
        self.write_s32(values.len() as i128);
        for value in values {
            self.write_s32(*value);
        }
    }

    pub fn write_list_s32_short(&mut self, values: &[i32]) {
        self.write_u16(values.len() as i128);
        for value in values {
            self.write_s32(*value);
        }
    }

    pub fn write_list_s32_long(&mut self, values: &[i32]) {
        self.write_u32(values.len() as i128);
        for value in values {
            self.write_s32(*value);
        }
    }

    pub fn write_string_list(&mut self, values: &[String]) {
        self.write_u32(values.len() as i128);
        for value in values {
            self.write_string(value);
        }
    }
}
