use crate::archive::entry::{normalize_name, PackEntry};
use crate::archive::filetime::FileTime;
use crate::archive::format::{FileHeader, PackageHeader, INDEX_OFFSET, MAX_ROOT_LENGTH};
use crate::archive::index::{decode_index, encode_index, NameLayout};
use crate::archive::pipeline::EntryStream;
use crate::archive::segment::RangeView;
use crate::error::{PackError, Result};
use crate::summary::{EntrySummary, PackSummary};
use indexmap::IndexMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Upper bound on the buffer reserved up front by `read_entry`; sizes come from the index
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Pack reader with lookup by normalized name
///
/// Supports reading entries and rewriting metadata (names, timestamps,
/// revision, root) in place. Payload bytes are never moved.
pub struct PackReader<R> {
    inner: R,
    header: FileHeader,
    package: PackageHeader,
    entries: IndexMap<String, PackEntry>,
    data_start: u64,
}

impl PackReader<File> {
    /// Open a pack file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::open(path)?)
    }

    /// Open a pack file for reading and in-place metadata saves
    pub fn open_rw<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> PackReader<R> {
    /// Parse the header and index from a seekable store
    pub fn new(mut inner: R) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;

        let header = FileHeader::read_from(&mut inner)?;
        let package = PackageHeader::read_from(&mut inner)?;
        tracing::debug!(
            revision = header.revision,
            entries = package.entry_count,
            index_size = package.info_header_size,
            data_size = package.data_section_size,
            "read pack headers"
        );

        if header.entry_count != package.entry_count {
            tracing::warn!(
                file_header = header.entry_count,
                package_header = package.entry_count,
                "entry counts disagree, using package header"
            );
        }

        // Read through `take` so a corrupt size cannot force a huge allocation
        let index_len = u64::from(package.info_header_size);
        let mut index = Vec::new();
        (&mut inner).take(index_len).read_to_end(&mut index)?;
        if index.len() as u64 != index_len {
            return Err(PackError::InvalidFormat(format!(
                "Index truncated: {} bytes (expected {})",
                index.len(),
                index_len
            )));
        }

        let mut entries = IndexMap::new();
        for entry in decode_index(&index, package.entry_count)? {
            if let Some(previous) = entries.insert(entry.normalized_name(), entry) {
                tracing::warn!(name = previous.name(), "duplicate entry name, keeping the later one");
            }
        }

        let data_start = inner.stream_position()?;

        let data_size = u64::from(package.data_section_size);
        for entry in entries.values() {
            let end = entry.data_offset + u64::from(entry.size_in_pack);
            if end > data_size {
                tracing::warn!(
                    name = entry.name(),
                    end,
                    data_size,
                    "entry extends past the data section"
                );
            }
        }

        tracing::debug!(entries = entries.len(), data_start, "loaded pack index");

        Ok(Self {
            inner,
            header,
            package,
            entries,
            data_start,
        })
    }

    /// Get the pack revision
    pub fn revision(&self) -> u32 {
        self.header.revision
    }

    pub fn set_revision(&mut self, revision: u32) {
        self.header.revision = revision;
    }

    /// Get the root path entries are mounted under
    pub fn root(&self) -> &str {
        &self.header.root
    }

    pub fn set_root(&mut self, root: impl Into<String>) -> Result<()> {
        let root = root.into();
        if root.len() > MAX_ROOT_LENGTH {
            return Err(PackError::RootTooLong {
                len: root.len(),
                max: MAX_ROOT_LENGTH,
            });
        }
        self.header.root = root;
        Ok(())
    }

    pub fn created(&self) -> FileTime {
        self.header.created
    }

    pub fn set_created(&mut self, created: FileTime) {
        self.header.created = created;
    }

    pub fn modified(&self) -> FileTime {
        self.header.modified
    }

    pub fn set_modified(&mut self, modified: FileTime) {
        self.header.modified = modified;
    }

    /// Absolute offset of the data section
    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    /// Data section size recorded in the package header
    pub fn data_section_size(&self) -> u32 {
        self.package.data_section_size
    }

    /// Blank padding after the index recorded in the package header
    pub fn blank_size(&self) -> u32 {
        self.package.blank_size
    }

    /// Get number of entries in the pack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order
    pub fn entries(&self) -> impl Iterator<Item = &PackEntry> {
        self.entries.values()
    }

    /// Registry keys in index order
    pub fn normalized_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Check if an entry exists (the name is normalized first)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    /// Get entry metadata without reading data
    pub fn get(&self, name: &str) -> Option<&PackEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// Mutable entry metadata, for edits persisted by [`PackReader::save`]
    ///
    /// Names are changed through [`PackReader::rename`] so the registry key follows.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackEntry> {
        self.entries.get_mut(&normalize_name(name))
    }

    /// Rename an entry and re-key the registry
    ///
    /// If the new name collides with another entry, the renamed one wins.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<()> {
        let key = normalize_name(name);
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| PackError::EntryNotFound(name.to_string()))?;
        entry.set_name(new_name)?;

        let new_key = entry.normalized_name();
        if new_key != key {
            if let Some(renamed) = self.entries.shift_remove(&key) {
                if self.entries.contains_key(&new_key) {
                    tracing::warn!(name = new_name, "rename replaces an existing entry");
                }
                self.entries.insert(new_key, renamed);
            }
        }
        Ok(())
    }

    /// Decoded contents of an entry (range view, cipher, then zlib if compressed)
    pub fn extract(&mut self, name: &str) -> Result<EntryStream<'_, R>> {
        let (view, seed, compressed) = self.open_range(name)?;
        Ok(EntryStream::decode(view, seed, compressed))
    }

    /// Decrypted but still compressed contents of an entry
    pub fn extract_decrypted(&mut self, name: &str) -> Result<EntryStream<'_, R>> {
        let (view, seed, _) = self.open_range(name)?;
        Ok(EntryStream::decode(view, seed, false))
    }

    /// Stored bytes of an entry, exactly as they appear in the pack
    pub fn extract_raw(&mut self, name: &str) -> Result<EntryStream<'_, R>> {
        let (view, _, _) = self.open_range(name)?;
        Ok(EntryStream::Raw(view))
    }

    /// Read and decode a whole entry
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let capacity = self
            .get(name)
            .map_or(0, |e| (e.decompressed_size as usize).min(MAX_PREALLOC));
        let mut data = Vec::with_capacity(capacity);
        self.extract(name)?.read_to_end(&mut data)?;
        Ok(data)
    }

    fn open_range(&mut self, name: &str) -> Result<(RangeView<&mut R>, i32, bool)> {
        let entry = self
            .get(name)
            .ok_or_else(|| PackError::EntryNotFound(name.to_string()))?;
        let len = u64::from(entry.size_in_pack);
        let start = self
            .data_start
            .checked_add(entry.data_offset)
            .filter(|start| start.checked_add(len).is_some())
            .ok_or(PackError::EntryTooLarge(entry.data_offset))?;
        let (seed, compressed) = (entry.seed, entry.is_compressed);

        tracing::trace!(name, start, len, "opening entry range");
        let view = RangeView::new(&mut self.inner, start, len)?;
        Ok((view, seed, compressed))
    }

    /// Serializable listing of the pack
    pub fn summary(&self) -> PackSummary {
        PackSummary {
            revision: self.header.revision,
            root: self.header.root.clone(),
            created: self.header.created,
            modified: self.header.modified,
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| EntrySummary::new(key, entry))
                .collect(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Write + Seek> PackReader<R> {
    /// Rewrite the headers and index in place from the current metadata
    ///
    /// Names keep their original block sizes and the gap up to the data
    /// section becomes blank padding, so the data section does not move.
    pub fn save(&mut self) -> Result<()> {
        let index = encode_index(self.entries.values(), NameLayout::Preserve)?;
        let index_end = INDEX_OFFSET + index.len() as u64;
        let blank = self.data_start.checked_sub(index_end).ok_or_else(|| {
            PackError::InvalidFormat(format!(
                "Index of {} bytes no longer fits before the data section at {}",
                index.len(),
                self.data_start
            ))
        })?;

        let store_end = self.inner.seek(SeekFrom::End(0))?;
        let data_size = store_end.saturating_sub(self.data_start);

        let entry_count = self.entries.len() as u32;
        let package = PackageHeader {
            entry_count,
            info_header_size: to_u32(index.len() as u64 + blank)?,
            blank_size: to_u32(blank)?,
            data_section_size: to_u32(data_size)?,
        };
        self.header.entry_count = entry_count;

        self.inner.seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.inner)?;
        package.write_to(&mut self.inner)?;
        self.inner.write_all(&index)?;
        io::copy(&mut io::repeat(0).take(blank), &mut self.inner)?;
        self.inner.flush()?;

        tracing::debug!(
            entries = entry_count,
            index_size = index.len(),
            blank,
            "saved pack metadata"
        );
        self.package = package;
        Ok(())
    }
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| PackError::EntryTooLarge(value))
}
