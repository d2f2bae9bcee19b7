use crate::archive::filetime::FileTime;
use crate::archive::format::ItemInfo;
use crate::error::{PackError, Result};

/// Normalize a path into a registry key: uppercase, forward slashes
///
/// Case mapping is one character to one character. Characters whose uppercase
/// form expands (such as 'ß') are kept as they are, so distinct names never
/// fold into the same key by changing length.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' => '/',
            c => upper_single(c),
        })
        .collect()
}

fn upper_single(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// One named blob stored in a pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    name: String,
    max_name_length: Option<usize>,
    pub seed: i32,
    pub is_compressed: bool,
    pub size_in_pack: u32,
    pub decompressed_size: u32,
    pub data_offset: u64,
    pub created: FileTime,
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl PackEntry {
    /// Create an entry with no limit on its name length
    pub fn new(
        name: impl Into<String>,
        seed: i32,
        is_compressed: bool,
        size_in_pack: u32,
        decompressed_size: u32,
        data_offset: u64,
        created: FileTime,
        modified: FileTime,
        accessed: FileTime,
    ) -> Self {
        Self {
            name: name.into(),
            max_name_length: None,
            seed,
            is_compressed,
            size_in_pack,
            decompressed_size,
            data_offset,
            created,
            modified,
            accessed,
        }
    }

    /// Build an entry from a decoded index record
    ///
    /// The name must fit the block it was decoded from.
    pub fn from_index(info: &ItemInfo, name: String, max_name_length: usize) -> Result<Self> {
        if name.len() > max_name_length {
            return Err(PackError::NameTooLong {
                len: name.len(),
                max: max_name_length,
            });
        }

        Ok(Self {
            name,
            max_name_length: Some(max_name_length),
            seed: info.seed,
            is_compressed: info.is_compressed,
            size_in_pack: info.compressed_size,
            decompressed_size: info.decompressed_size,
            data_offset: u64::from(info.offset),
            created: info.creation_time,
            modified: info.modified_time2,
            accessed: info.last_access_time,
        })
    }

    /// Build the on-disk record, duplicating the created and modified times
    pub fn to_item_info(&self) -> Result<ItemInfo> {
        let offset = u32::try_from(self.data_offset)
            .map_err(|_| PackError::EntryTooLarge(self.data_offset))?;

        Ok(ItemInfo {
            seed: self.seed,
            zero: 0,
            offset,
            compressed_size: self.size_in_pack,
            decompressed_size: self.decompressed_size,
            is_compressed: self.is_compressed,
            creation_time: self.created,
            creation_time2: self.created,
            last_access_time: self.accessed,
            modified_time: self.modified,
            modified_time2: self.modified,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entry; fails without changes if the name exceeds the maximum
    ///
    /// Crate-internal: a reader's registry is keyed by name, so renames of
    /// loaded entries go through [`PackReader::rename`](crate::PackReader::rename).
    pub(crate) fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if let Some(max) = self.max_name_length {
            if name.len() > max {
                return Err(PackError::NameTooLong {
                    len: name.len(),
                    max,
                });
            }
        }
        self.name = name;
        Ok(())
    }

    /// Longest name the entry accepts, `None` when unlimited
    pub fn max_name_length(&self) -> Option<usize> {
        self.max_name_length
    }

    /// Registry key for this entry
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}
