//! Primitive little-endian encoding.
//!
//! The mirror image of [`ByteCursor`](crate::cursor::ByteCursor), used to
//! build capture buffers and to check that reads re-encode byte-for-byte.

use crate::cursor::{IntWidth, STRING_MARKER};
use byteorder::{ByteOrder, LittleEndian};

/// Growable buffer of little-endian primitives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create an empty writer
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Bytes written so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Written bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume and return the written bytes
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append the low `width` bytes of `value`
    pub fn write_uint(&mut self, width: IntWidth, value: u64) -> &mut Self {
        let n = width.bytes();
        let mut scratch = [0u8; 8];
        LittleEndian::write_uint(&mut scratch[..n], value, n);
        self.write_bytes(&scratch[..n])
    }

    /// Append one byte
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Append a little-endian `u16`
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        let mut scratch = [0u8; 2];
        LittleEndian::write_u16(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian `i16`
    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        let mut scratch = [0u8; 2];
        LittleEndian::write_i16(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian `u32`
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        let mut scratch = [0u8; 4];
        LittleEndian::write_u32(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian `i32`
    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        let mut scratch = [0u8; 4];
        LittleEndian::write_i32(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian `u64`
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        let mut scratch = [0u8; 8];
        LittleEndian::write_u64(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian `i64`
    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        let mut scratch = [0u8; 8];
        LittleEndian::write_i64(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian single
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        let mut scratch = [0u8; 4];
        LittleEndian::write_f32(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append a little-endian double
    pub fn write_f64(&mut self, value: f64) -> &mut Self {
        let mut scratch = [0u8; 8];
        LittleEndian::write_f64(&mut scratch, value);
        self.write_bytes(&scratch)
    }

    /// Append the string marker followed by a ULEB128 value
    pub fn write_var_uint(&mut self, mut value: u64) -> &mut Self {
        self.buf.push(STRING_MARKER);
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return self;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Append a length-prefixed UTF-8 string
    pub fn write_string(&mut self, text: &str) -> &mut Self {
        self.write_var_uint(text.len() as u64);
        self.write_bytes(text.as_bytes())
    }
}
