//! Variable-size name blocks preceding each item info record.
//!
//! A block is chosen from three size classes by the UTF-8 length of the name
//! plus its terminating NUL (the "required length"):
//!
//! | class | required length | block size              | name starts at |
//! |-------|-----------------|-------------------------|----------------|
//! | 0..=3 | 1..=63          | `(required / 16 + 1) * 16` | 1           |
//! | 4     | 64..=95         | 96                      | 1              |
//! | 5     | 96..            | `required + 5`          | 5              |
//!
//! Class 5 stores the required length as a little-endian int32 after the class byte.

use crate::error::{PackError, Result};
use byteorder::{ByteOrder, LittleEndian};

const SHORT_LIMIT: usize = 0x10 * 4 - 1;
const MEDIUM_LIMIT: usize = 0x60 - 1;
const MEDIUM_BLOCK: usize = 0x60;
const LONG_CLASS: u8 = 5;
const LONG_PREFIX: usize = 1 + 4;

/// A name block decoded from an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub name: String,
    /// Longest name (in bytes) the block can hold when written back
    pub max_name_length: usize,
    /// Total size of the block, prefix included
    pub block_len: usize,
}

/// Size class a name of `name_len` UTF-8 bytes is stored in
pub fn size_class(name_len: usize) -> u8 {
    let required = name_len + 1;
    if required <= SHORT_LIMIT {
        (required / 0x10) as u8
    } else if required <= MEDIUM_LIMIT {
        4
    } else {
        LONG_CLASS
    }
}

/// Size of the block `encode_name` produces for `name`
pub fn encoded_name_len(name: &str) -> usize {
    let required = name.len() + 1;
    match size_class(name.len()) {
        class @ 0..=3 => (class as usize + 1) * 0x10,
        4 => MEDIUM_BLOCK,
        _ => required + LONG_PREFIX,
    }
}

/// Encode `name` with a trailing NUL into the smallest fitting block
pub fn encode_name(name: &str) -> Vec<u8> {
    let raw = name.as_bytes();
    let required = raw.len() + 1;
    let class = size_class(raw.len());

    let mut block = vec![0u8; encoded_name_len(name)];
    block[0] = class;

    let start = if class == LONG_CLASS {
        LittleEndian::write_u32(&mut block[1..LONG_PREFIX], required as u32);
        LONG_PREFIX
    } else {
        1
    };
    block[start..start + raw.len()].copy_from_slice(raw);
    block
}

/// Encode `name` padded with NULs to `max_name_length` bytes
///
/// A name decoded with a given maximum re-encodes to a block of the same size,
/// which lets metadata be rewritten without shifting the index.
pub fn encode_name_padded(name: &str, max_name_length: usize) -> Result<Vec<u8>> {
    if name.len() > max_name_length {
        return Err(PackError::NameTooLong {
            len: name.len(),
            max: max_name_length,
        });
    }

    let mut block = encode_name(&"\0".repeat(max_name_length));
    let start = block.len() - max_name_length - 1;
    block[start..start + name.len()].copy_from_slice(name.as_bytes());
    Ok(block)
}

/// Decode the name block starting at `offset` in `buf`
pub fn decode_name(buf: &[u8], offset: usize) -> Result<DecodedName> {
    let class = *buf
        .get(offset)
        .ok_or_else(|| PackError::InvalidFormat(format!("Name block at {} truncated", offset)))?;

    let (block_len, prefix_len) = match class {
        0..=3 => ((class as usize + 1) * 0x10, 1),
        4 => (MEDIUM_BLOCK, 1),
        _ => {
            let len_bytes = buf.get(offset + 1..offset + LONG_PREFIX).ok_or_else(|| {
                PackError::InvalidFormat(format!("Name length at {} truncated", offset))
            })?;
            let required = LittleEndian::read_i32(len_bytes);
            if required < 1 {
                return Err(PackError::InvalidFormat(format!(
                    "Invalid name length {} at {}",
                    required, offset
                )));
            }
            (required as usize + LONG_PREFIX, LONG_PREFIX)
        }
    };

    let block = buf.get(offset..offset + block_len).ok_or_else(|| {
        PackError::InvalidFormat(format!(
            "Name block at {} needs {} bytes, {} available",
            offset,
            block_len,
            buf.len().saturating_sub(offset)
        ))
    })?;

    let max_name_length = block_len - prefix_len - 1;
    let raw = &block[prefix_len..prefix_len + max_name_length];
    let len = raw.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
    let name = String::from_utf8(raw[..len].to_vec())
        .map_err(|e| PackError::InvalidFormat(format!("Invalid UTF-8 in entry name: {}", e)))?;

    Ok(DecodedName {
        name,
        max_name_length,
        block_len,
    })
}
