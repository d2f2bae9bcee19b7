//! Field descriptor tables for the fixed-size records.
//!
//! Every record lists its fields as `(name, offset, width)` and goes through the
//! accessors below, so the byte layout is spelled out in one place instead of
//! depending on in-memory struct layout. All integers are little-endian.

use crate::error::{PackError, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Read};

/// One field of a fixed-size record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.offset..self.end()]
    }

    fn slice_mut<'a>(&self, buf: &'a mut [u8]) -> &'a mut [u8] {
        &mut buf[self.offset..self.end()]
    }
}

/// True when `fields` cover `[0, size)` in order with no gaps or overlaps
pub fn tiles_exactly(fields: &[Field], size: usize) -> bool {
    let mut cursor = 0;
    for field in fields {
        if field.offset != cursor || field.width == 0 {
            return false;
        }
        cursor = field.end();
    }
    cursor == size
}

/// Fill `buf` from `reader`, reporting a short read as a truncated `record`
pub fn read_record<R: Read>(mut reader: R, buf: &mut [u8], record: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            PackError::InvalidFormat(format!("{} truncated (need {} bytes)", record, buf.len()))
        }
        _ => PackError::from(err),
    })
}

/// Fail unless `buf` holds at least `size` bytes of a `record`
pub fn ensure_len(buf: &[u8], size: usize, record: &str) -> Result<()> {
    if buf.len() < size {
        return Err(PackError::InvalidFormat(format!(
            "{} truncated: {} bytes (need {})",
            record,
            buf.len(),
            size
        )));
    }
    Ok(())
}

pub fn get_u32(buf: &[u8], field: Field) -> u32 {
    debug_assert_eq!(field.width, 4, "{}", field.name);
    LittleEndian::read_u32(field.slice(buf))
}

pub fn get_i32(buf: &[u8], field: Field) -> i32 {
    debug_assert_eq!(field.width, 4, "{}", field.name);
    LittleEndian::read_i32(field.slice(buf))
}

pub fn get_i64(buf: &[u8], field: Field) -> i64 {
    debug_assert_eq!(field.width, 8, "{}", field.name);
    LittleEndian::read_i64(field.slice(buf))
}

pub fn get_bytes(buf: &[u8], field: Field) -> &[u8] {
    field.slice(buf)
}

/// Read a NUL-padded UTF-8 string field
pub fn get_str(buf: &[u8], field: Field) -> Result<String> {
    let raw = field.slice(buf);
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8(raw[..len].to_vec()).map_err(|e| {
        PackError::InvalidFormat(format!("Invalid UTF-8 in {}: {}", field.name, e))
    })
}

pub fn put_u32(buf: &mut [u8], field: Field, value: u32) {
    debug_assert_eq!(field.width, 4, "{}", field.name);
    LittleEndian::write_u32(field.slice_mut(buf), value);
}

pub fn put_i32(buf: &mut [u8], field: Field, value: i32) {
    debug_assert_eq!(field.width, 4, "{}", field.name);
    LittleEndian::write_i32(field.slice_mut(buf), value);
}

pub fn put_i64(buf: &mut [u8], field: Field, value: i64) {
    debug_assert_eq!(field.width, 8, "{}", field.name);
    LittleEndian::write_i64(field.slice_mut(buf), value);
}

pub fn put_bytes(buf: &mut [u8], field: Field, value: &[u8]) {
    debug_assert_eq!(field.width, value.len(), "{}", field.name);
    field.slice_mut(buf).copy_from_slice(value);
}

/// Write a string NUL-padded to the field width
///
/// Strings that do not fit are cut at a character boundary, keeping at least
/// one terminating NUL.
pub fn put_str(buf: &mut [u8], field: Field, value: &str) {
    let mut len = value.len().min(field.width.saturating_sub(1));
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    let dst = field.slice_mut(buf);
    dst.fill(0);
    dst[..len].copy_from_slice(&value.as_bytes()[..len]);
}
