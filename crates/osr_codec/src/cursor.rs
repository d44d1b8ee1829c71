//! Cursor for reading replay buffers.
//!
//! All integers and floats are little-endian. Strings are a marker byte, a
//! ULEB128 length, then UTF-8 bytes.

use byteorder::{ByteOrder, LittleEndian};
use osr_core::{ReplayError, ReplayResult};

/// Marker byte that precedes every length-prefixed string
pub const STRING_MARKER: u8 = 0x0b;

/// Marker byte written in place of [`STRING_MARKER`] for an absent string
pub const ABSENT_STRING: u8 = 0x00;

/// Width of a fixed-size integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 1 byte
    One,
    /// 2 bytes
    Two,
    /// 4 bytes
    Four,
    /// 8 bytes
    Eight,
}

impl IntWidth {
    /// Number of bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// Sequential reader over an immutable byte buffer.
///
/// The offset only moves forward, and only on successful reads.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Cursor at the start of `buf`
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes consumed so far
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// True once every byte has been consumed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the buffer
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    /// Read the next `n` bytes
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::OutOfBounds`] if fewer than `n` bytes remain
    pub fn read(&mut self, n: usize) -> ReplayResult<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ReplayError::OutOfBounds {
                offset: self.offset,
                requested: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Read an unsigned integer of the given width
    pub fn read_uint(&mut self, width: IntWidth) -> ReplayResult<u64> {
        let n = width.bytes();
        Ok(LittleEndian::read_uint(self.read(n)?, n))
    }

    /// Read a two's-complement signed integer of the given width
    pub fn read_int(&mut self, width: IntWidth) -> ReplayResult<i64> {
        let n = width.bytes();
        Ok(LittleEndian::read_int(self.read(n)?, n))
    }

    /// Read one unsigned byte
    pub fn read_u8(&mut self) -> ReplayResult<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read one signed byte
    pub fn read_i8(&mut self) -> ReplayResult<i8> {
        Ok(self.read(1)?[0] as i8)
    }

    /// Read a little-endian `u16`
    pub fn read_u16(&mut self) -> ReplayResult<u16> {
        Ok(LittleEndian::read_u16(self.read(2)?))
    }

    /// Read a little-endian `i16`
    pub fn read_i16(&mut self) -> ReplayResult<i16> {
        Ok(LittleEndian::read_i16(self.read(2)?))
    }

    /// Read a little-endian `u32`
    pub fn read_u32(&mut self) -> ReplayResult<u32> {
        Ok(LittleEndian::read_u32(self.read(4)?))
    }

    /// Read a little-endian `i32`
    pub fn read_i32(&mut self) -> ReplayResult<i32> {
        Ok(LittleEndian::read_i32(self.read(4)?))
    }

    /// Read a little-endian `u64`
    pub fn read_u64(&mut self) -> ReplayResult<u64> {
        Ok(LittleEndian::read_u64(self.read(8)?))
    }

    /// Read a little-endian `i64`
    pub fn read_i64(&mut self) -> ReplayResult<i64> {
        Ok(LittleEndian::read_i64(self.read(8)?))
    }

    /// Read a little-endian IEEE-754 single
    pub fn read_f32(&mut self) -> ReplayResult<f32> {
        Ok(LittleEndian::read_f32(self.read(4)?))
    }

    /// Read a little-endian IEEE-754 double
    pub fn read_f64(&mut self) -> ReplayResult<f64> {
        Ok(LittleEndian::read_f64(self.read(8)?))
    }

    /// Read a marker-prefixed ULEB128 integer.
    ///
    /// Bits beyond the 64th are dropped; the group count is bounded only by
    /// the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::MalformedVarint`] if the first byte is not
    /// [`STRING_MARKER`], or [`ReplayError::OutOfBounds`] if the buffer ends
    /// mid-value.
    pub fn read_var_uint(&mut self) -> ReplayResult<u64> {
        let marker_offset = self.offset;
        let marker = self.read_u8()?;
        if marker != STRING_MARKER {
            self.offset = marker_offset;
            return Err(ReplayError::MalformedVarint {
                offset: marker_offset,
                found: marker,
            });
        }
        self.read_uleb128()
    }

    fn read_uleb128(&mut self) -> ReplayResult<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift < u64::BITS {
                value |= u64::from(byte & 0x7f) << shift;
            }
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift = shift.saturating_add(7);
        }
    }

    /// Read a length-prefixed UTF-8 string
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::MalformedVarint`] on a missing marker and
    /// [`ReplayError::InvalidEncoding`] if the payload is not UTF-8
    pub fn read_string(&mut self) -> ReplayResult<String> {
        let len = self.read_var_uint()?;
        self.read_string_payload(len)
    }

    /// Read a string that may be written as a lone `0x00` byte.
    ///
    /// Returns `None` for the absent form; otherwise behaves like
    /// [`ByteCursor::read_string`].
    pub fn read_optional_string(&mut self) -> ReplayResult<Option<String>> {
        let marker_offset = self.offset;
        match self.read_u8()? {
            ABSENT_STRING => Ok(None),
            STRING_MARKER => {
                let len = self.read_uleb128()?;
                self.read_string_payload(len).map(Some)
            }
            found => {
                self.offset = marker_offset;
                Err(ReplayError::MalformedVarint {
                    offset: marker_offset,
                    found,
                })
            }
        }
    }

    fn read_string_payload(&mut self, len: u64) -> ReplayResult<String> {
        let offset = self.offset;
        let len = usize::try_from(len).map_err(|_| ReplayError::OutOfBounds {
            offset,
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;
        let bytes = self.read(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ReplayError::InvalidEncoding {
                offset: Some(offset),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ByteWriter;
    use proptest::prelude::*;

    #[test]
    fn test_cursor_new() {
        let cursor = ByteCursor::new(&[1, 2, 3]);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn test_read_advances() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4]);
        assert_eq!(cursor.read(3).unwrap(), &[1, 2, 3]);
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.rest(), &[4]);
    }

    #[test]
    fn test_read_out_of_bounds() {
        let mut cursor = ByteCursor::new(&[1, 2]);
        let err = cursor.read(3).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::OutOfBounds {
                offset: 0,
                requested: 3,
                remaining: 2
            }
        ));
        // Failed reads leave the offset alone
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_little_endian_integers() {
        let data = [0x34, 0x12, 0xff, 0xff, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32().unwrap(), -1);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_uint_widths() {
        let data = [0xfe, 0x01, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_int(IntWidth::One).unwrap(), -2);
        assert_eq!(cursor.read_uint(IntWidth::One).unwrap(), 1);
        assert_eq!(cursor.read_int(IntWidth::Eight).unwrap(), i64::MIN + 0x80);
    }

    #[test]
    fn test_read_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -2.25);
    }

    #[test]
    fn test_var_uint_single_byte() {
        let mut cursor = ByteCursor::new(&[0x0b, 0x05]);
        assert_eq!(cursor.read_var_uint().unwrap(), 5);
    }

    #[test]
    fn test_var_uint_multi_byte() {
        // 624485 = 0xe5 0x8e 0x26
        let mut cursor = ByteCursor::new(&[0x0b, 0xe5, 0x8e, 0x26]);
        assert_eq!(cursor.read_var_uint().unwrap(), 624_485);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_var_uint_missing_marker() {
        let mut cursor = ByteCursor::new(&[0x00, 0x05]);
        let err = cursor.read_var_uint().unwrap_err();
        assert!(matches!(
            err,
            ReplayError::MalformedVarint {
                offset: 0,
                found: 0x00
            }
        ));
    }

    #[test]
    fn test_var_uint_truncated() {
        let mut cursor = ByteCursor::new(&[0x0b, 0x80, 0x80]);
        assert!(matches!(
            cursor.read_var_uint(),
            Err(ReplayError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_var_uint_overlong_does_not_panic() {
        let mut data = vec![0x0b];
        data.extend(std::iter::repeat_n(0xff, 20));
        data.push(0x01);
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.read_var_uint().is_ok());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_string() {
        let mut cursor = ByteCursor::new(&[0x0b, 0x03, b'a', b'b', b'c', 0xff]);
        assert_eq!(cursor.read_string().unwrap(), "abc");
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let mut cursor = ByteCursor::new(&[0x0b, 0x02, 0xc3, 0x28]);
        let err = cursor.read_string().unwrap_err();
        assert!(matches!(err, ReplayError::InvalidEncoding { offset: Some(2) }));
    }

    #[test]
    fn test_read_string_length_exceeds_buffer() {
        let mut cursor = ByteCursor::new(&[0x0b, 0x0a, b'a']);
        assert!(matches!(
            cursor.read_string(),
            Err(ReplayError::OutOfBounds {
                offset: 2,
                requested: 10,
                remaining: 1
            })
        ));
    }

    #[test]
    fn test_read_optional_string() {
        let mut cursor = ByteCursor::new(&[0x00, 0x0b, 0x01, b'x', 0x07]);
        assert_eq!(cursor.read_optional_string().unwrap(), None);
        assert_eq!(cursor.read_optional_string().unwrap(), Some("x".to_string()));
        assert!(matches!(
            cursor.read_optional_string(),
            Err(ReplayError::MalformedVarint { offset: 4, found: 0x07 })
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_fixed_width_roundtrip(a: u8, b: i16, c: u32, d: i64, e: u64) {
            let mut writer = ByteWriter::new();
            writer.write_u8(a);
            writer.write_i16(b);
            writer.write_u32(c);
            writer.write_i64(d);
            writer.write_u64(e);
            let bytes = writer.into_inner();

            let mut cursor = ByteCursor::new(&bytes);
            let (ra, rb, rc, rd, re) = (
                cursor.read_u8().unwrap(),
                cursor.read_i16().unwrap(),
                cursor.read_u32().unwrap(),
                cursor.read_i64().unwrap(),
                cursor.read_u64().unwrap(),
            );
            prop_assert!(cursor.is_empty());

            let mut rewriter = ByteWriter::new();
            rewriter.write_u8(ra);
            rewriter.write_i16(rb);
            rewriter.write_u32(rc);
            rewriter.write_i64(rd);
            rewriter.write_u64(re);
            prop_assert_eq!(rewriter.into_inner(), bytes);
        }

        #[test]
        fn prop_generic_width_roundtrip(value: u64, width_idx in 0usize..4) {
            let width = [IntWidth::One, IntWidth::Two, IntWidth::Four, IntWidth::Eight][width_idx];
            let mask = if width == IntWidth::Eight {
                u64::MAX
            } else {
                (1u64 << (width.bytes() * 8)) - 1
            };
            let value = value & mask;

            let mut writer = ByteWriter::new();
            writer.write_uint(width, value);
            let bytes = writer.into_inner();
            prop_assert_eq!(bytes.len(), width.bytes());

            let mut cursor = ByteCursor::new(&bytes);
            prop_assert_eq!(cursor.read_uint(width).unwrap(), value);
        }

        #[test]
        fn prop_string_roundtrip(text in "\\PC{0,300}") {
            let mut writer = ByteWriter::new();
            writer.write_string(&text);
            let bytes = writer.into_inner();

            let mut cursor = ByteCursor::new(&bytes);
            prop_assert_eq!(cursor.read_string().unwrap(), text);
            prop_assert!(cursor.is_empty());
        }

        #[test]
        fn prop_reads_never_panic(data: Vec<u8>) {
            let mut cursor = ByteCursor::new(&data);
            while cursor.read_string().is_ok() {}
            let _ = cursor.read_f64();
        }
    }
}
