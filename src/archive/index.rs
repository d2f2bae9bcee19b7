//! The index block: one name block plus one item info record per entry.
//!
//! Shared by the reader (parse and in-place save) and the writer (emit).

use crate::archive::entry::PackEntry;
use crate::archive::format::{ItemInfo, ITEM_INFO_SIZE};
use crate::archive::name::{decode_name, encode_name, encode_name_padded};
use crate::error::{PackError, Result};

/// Smallest possible index record: a 16-byte name block plus the item info
const MIN_RECORD_SIZE: usize = 16 + ITEM_INFO_SIZE;

/// How names are laid out when an index is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLayout {
    /// Smallest block that fits each name
    Compact,
    /// Entries loaded from an index keep their original block size
    Preserve,
}

/// Decode `entry_count` index records from `buf`
pub fn decode_index(buf: &[u8], entry_count: u32) -> Result<Vec<PackEntry>> {
    let count = entry_count as usize;
    let mut entries = Vec::with_capacity(count.min(buf.len() / MIN_RECORD_SIZE));
    let mut ptr = 0;

    for index in 0..count {
        let decoded = decode_name(buf, ptr)?;
        ptr += decoded.block_len;

        let info = ItemInfo::from_bytes(buf, ptr)?;
        if info.zero != 0 {
            return Err(PackError::CorruptEntry {
                index,
                name: decoded.name,
            });
        }
        ptr += ITEM_INFO_SIZE;

        tracing::trace!(
            index,
            name = %decoded.name,
            offset = info.offset,
            size = info.compressed_size,
            "decoded index record"
        );
        entries.push(PackEntry::from_index(
            &info,
            decoded.name,
            decoded.max_name_length,
        )?);
    }

    Ok(entries)
}

/// Encode `entries` in order into an index block
pub fn encode_index<'a, I>(entries: I, layout: NameLayout) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a PackEntry>,
{
    let mut buf = Vec::new();
    for entry in entries {
        let block = match (layout, entry.max_name_length()) {
            (NameLayout::Preserve, Some(max)) => encode_name_padded(entry.name(), max)?,
            _ => encode_name(entry.name()),
        };
        buf.extend_from_slice(&block);
        buf.extend_from_slice(&entry.to_item_info()?.to_bytes());
    }
    Ok(buf)
}
