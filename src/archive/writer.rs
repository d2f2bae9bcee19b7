use crate::archive::entry::PackEntry;
use crate::archive::filetime::FileTime;
use crate::archive::format::{FileHeader, PackageHeader, MAX_ROOT_LENGTH};
use crate::archive::index::{encode_index, NameLayout};
use crate::crypto::CryptoStream;
use crate::error::{PackError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Per-entry settings for [`PackWriter::write_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryOptions {
    pub seed: i32,
    pub compress: bool,
    pub created: FileTime,
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl EntryOptions {
    /// Compressed entry with all timestamps set to now
    pub fn new(seed: i32) -> Self {
        let now = FileTime::now();
        Self {
            seed,
            compress: true,
            created: now,
            modified: now,
            accessed: now,
        }
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_created(mut self, created: FileTime) -> Self {
        self.created = created;
        self
    }

    pub fn with_modified(mut self, modified: FileTime) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_accessed(mut self, accessed: FileTime) -> Self {
        self.accessed = accessed;
        self
    }
}

/// Counts bytes pulled from the source
struct CountingReader<R> {
    inner: R,
    bytes: u64,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, bytes: 0 }
    }

    fn consumed(&self) -> u64 {
        self.bytes
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes = self.bytes.saturating_add(n as u64);
        Ok(n)
    }
}

/// Pack writer
///
/// Entry payloads are spooled into an anonymous temporary file as they are
/// written. The headers and index are only known once every entry is in, so
/// [`PackWriter::save_to`] emits them first and then copies the spool.
pub struct PackWriter {
    body: File,
    entries: Vec<PackEntry>,
    revision: u32,
    root: String,
    compression: Compression,
}

impl PackWriter {
    /// Create an empty pack
    pub fn new(revision: u32, root: impl Into<String>) -> Result<Self> {
        let root = root.into();
        if root.len() > MAX_ROOT_LENGTH {
            return Err(PackError::RootTooLong {
                len: root.len(),
                max: MAX_ROOT_LENGTH,
            });
        }

        Ok(Self {
            body: tempfile::tempfile()?,
            entries: Vec::new(),
            revision,
            root,
            compression: Compression::default(),
        })
    }

    /// Set the zlib level for compressed entries
    pub fn with_compression(mut self, level: Compression) -> Self {
        self.compression = level;
        self
    }

    /// Add an entry seeded with the revision, compressed, timestamped now
    pub fn write<R: Read>(&mut self, source: R, name: &str) -> Result<&PackEntry> {
        let options = EntryOptions::new(self.revision as i32);
        self.write_with(source, name, &options)
    }

    /// Add an entry with explicit options
    ///
    /// On failure the spool is cut back, so a failed entry leaves no bytes
    /// behind and is not recorded.
    pub fn write_with<R: Read>(
        &mut self,
        source: R,
        name: &str,
        options: &EntryOptions,
    ) -> Result<&PackEntry> {
        let start = self.body.seek(SeekFrom::End(0))?;

        let spooled = spool(&mut self.body, source, options, self.compression).and_then(|consumed| {
            let end = self.body.stream_position()?;
            Ok((to_u32(start)?, to_u32(end - start)?, to_u32(consumed)?))
        });
        let (_, size_in_pack, decompressed_size) = match spooled {
            Ok(sizes) => sizes,
            Err(err) => {
                self.body.set_len(start)?;
                self.body.seek(SeekFrom::Start(start))?;
                return Err(err);
            }
        };

        tracing::trace!(
            name,
            offset = start,
            size_in_pack,
            decompressed_size,
            compressed = options.compress,
            "spooled entry"
        );

        self.entries.push(PackEntry::new(
            name,
            options.seed,
            options.compress,
            size_in_pack,
            decompressed_size,
            start,
            options.created,
            options.modified,
            options.accessed,
        ));
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Emit the complete pack into `dst`
    ///
    /// Can be called repeatedly; each call stamps fresh header timestamps.
    pub fn save_to<W: Write>(&mut self, mut dst: W) -> Result<()> {
        let index = encode_index(&self.entries, NameLayout::Compact)?;
        let body_len = self.body.seek(SeekFrom::End(0))?;
        let entry_count = self.entries.len() as u32;
        let now = FileTime::now();

        let header = FileHeader {
            revision: self.revision,
            entry_count,
            created: now,
            modified: now,
            root: self.root.clone(),
        };
        let package = PackageHeader {
            entry_count,
            info_header_size: to_u32(index.len() as u64)?,
            blank_size: 0,
            data_section_size: to_u32(body_len)?,
        };

        header.write_to(&mut dst)?;
        package.write_to(&mut dst)?;
        dst.write_all(&index)?;

        self.body.seek(SeekFrom::Start(0))?;
        let copied = io::copy(&mut (&mut self.body).take(body_len), &mut dst)?;
        self.body.seek(SeekFrom::End(0))?;
        if copied != body_len {
            return Err(PackError::InvalidFormat(format!(
                "Spool shrank while saving: copied {copied} of {body_len} bytes"
            )));
        }
        dst.flush()?;

        tracing::debug!(
            entries = entry_count,
            index_size = index.len(),
            data_size = body_len,
            "saved pack"
        );
        Ok(())
    }

    /// Create (or truncate) the file at `path` and save into it
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.save_to(&mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}

/// Pipe `source` through zlib (optional) and the cipher into the spool
///
/// Returns the number of bytes consumed from `source`.
fn spool<R: Read>(
    body: &mut File,
    source: R,
    options: &EntryOptions,
    level: Compression,
) -> Result<u64> {
    let mut source = CountingReader::new(source);
    let mut cipher = CryptoStream::new(body, options.seed);

    if options.compress {
        let mut encoder = ZlibEncoder::new(&mut cipher, level);
        io::copy(&mut source, &mut encoder)?;
        encoder.finish()?;
    } else {
        io::copy(&mut source, &mut cipher)?;
    }
    cipher.flush()?;

    Ok(source.consumed())
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| PackError::EntryTooLarge(value))
}
