use crate::archive::filetime::FileTime;
use crate::archive::layout::{self, Field};
use crate::error::{PackError, Result};
use std::io::{Read, Write};

/// Magic signature: 'P' 'A' 'C' 'K' followed by format version 2.1
pub const MAGIC: [u8; 8] = [0x50, 0x41, 0x43, 0x4B, 0x02, 0x01, 0x00, 0x00];

/// File header size in bytes
pub const FILE_HEADER_SIZE: usize = 512;

/// Package header size in bytes
pub const PACKAGE_HEADER_SIZE: usize = 32;

/// Per-item info record size in bytes
pub const ITEM_INFO_SIZE: usize = 64;

/// Offset of the index block (file header + package header)
pub const INDEX_OFFSET: u64 = (FILE_HEADER_SIZE + PACKAGE_HEADER_SIZE) as u64;

/// Width of the NUL-padded root path field
pub const ROOT_FIELD_SIZE: usize = 480;

/// Longest root path that still leaves room for the terminating NUL
pub const MAX_ROOT_LENGTH: usize = ROOT_FIELD_SIZE - 1;

/// File header at the beginning of the pack
///
/// Layout (512 bytes):
/// - Signature: 8 bytes
/// - Revision: uint32
/// - Entry Count: int32
/// - Created: FILETIME (8 bytes)
/// - Modified: FILETIME (8 bytes)
/// - Root: 480 bytes, NUL-padded UTF-8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub revision: u32,
    pub entry_count: u32,
    pub created: FileTime,
    pub modified: FileTime,
    pub root: String,
}

impl FileHeader {
    const SIGNATURE: Field = Field::new("signature", 0, 8);
    const REVISION: Field = Field::new("revision", 8, 4);
    const ENTRY_COUNT: Field = Field::new("entry_count", 12, 4);
    const CREATED: Field = Field::new("created", 16, 8);
    const MODIFIED: Field = Field::new("modified", 24, 8);
    const ROOT: Field = Field::new("root", 32, ROOT_FIELD_SIZE);

    pub const FIELDS: &'static [Field] = &[
        Self::SIGNATURE,
        Self::REVISION,
        Self::ENTRY_COUNT,
        Self::CREATED,
        Self::MODIFIED,
        Self::ROOT,
    ];

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        layout::put_bytes(&mut buf, Self::SIGNATURE, &MAGIC);
        layout::put_u32(&mut buf, Self::REVISION, self.revision);
        layout::put_u32(&mut buf, Self::ENTRY_COUNT, self.entry_count);
        layout::put_i64(&mut buf, Self::CREATED, self.created.raw());
        layout::put_i64(&mut buf, Self::MODIFIED, self.modified.raw());
        layout::put_str(&mut buf, Self::ROOT, &self.root);
        buf
    }

    /// Decode a header, rejecting anything without the pack signature
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        layout::ensure_len(buf, FILE_HEADER_SIZE, "File header")?;

        let signature = layout::get_bytes(buf, Self::SIGNATURE);
        if signature != MAGIC {
            let mut found = [0u8; 8];
            found.copy_from_slice(signature);
            return Err(PackError::InvalidMagic(found));
        }

        Ok(Self {
            revision: layout::get_u32(buf, Self::REVISION),
            entry_count: layout::get_u32(buf, Self::ENTRY_COUNT),
            created: FileTime::from_raw(layout::get_i64(buf, Self::CREATED)),
            modified: FileTime::from_raw(layout::get_i64(buf, Self::MODIFIED)),
            root: layout::get_str(buf, Self::ROOT)?,
        })
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        layout::read_record(&mut reader, &mut buf, "File header")?;
        Self::from_bytes(&buf)
    }
}

/// Package header following the file header
///
/// Layout (32 bytes):
/// - Entry Count: int32
/// - Info Header Size: int32 (index block length, blank padding included)
/// - Blank Size: int32
/// - Data Section Size: uint32
/// - Reserved: 16 bytes, always zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHeader {
    pub entry_count: u32,
    pub info_header_size: u32,
    pub blank_size: u32,
    pub data_section_size: u32,
}

impl PackageHeader {
    const ENTRY_COUNT: Field = Field::new("entry_count", 0, 4);
    const INFO_HEADER_SIZE: Field = Field::new("info_header_size", 4, 4);
    const BLANK_SIZE: Field = Field::new("blank_size", 8, 4);
    const DATA_SECTION_SIZE: Field = Field::new("data_section_size", 12, 4);
    const RESERVED: Field = Field::new("reserved", 16, 16);

    pub const FIELDS: &'static [Field] = &[
        Self::ENTRY_COUNT,
        Self::INFO_HEADER_SIZE,
        Self::BLANK_SIZE,
        Self::DATA_SECTION_SIZE,
        Self::RESERVED,
    ];

    pub fn to_bytes(&self) -> [u8; PACKAGE_HEADER_SIZE] {
        let mut buf = [0u8; PACKAGE_HEADER_SIZE];
        layout::put_u32(&mut buf, Self::ENTRY_COUNT, self.entry_count);
        layout::put_u32(&mut buf, Self::INFO_HEADER_SIZE, self.info_header_size);
        layout::put_u32(&mut buf, Self::BLANK_SIZE, self.blank_size);
        layout::put_u32(&mut buf, Self::DATA_SECTION_SIZE, self.data_section_size);
        buf
    }

    /// Decode a package header, rejecting non-zero reserved bytes
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        layout::ensure_len(buf, PACKAGE_HEADER_SIZE, "Package header")?;

        if layout::get_bytes(buf, Self::RESERVED).iter().any(|&b| b != 0) {
            return Err(PackError::CorruptHeader);
        }

        Ok(Self {
            entry_count: layout::get_u32(buf, Self::ENTRY_COUNT),
            info_header_size: layout::get_u32(buf, Self::INFO_HEADER_SIZE),
            blank_size: layout::get_u32(buf, Self::BLANK_SIZE),
            data_section_size: layout::get_u32(buf, Self::DATA_SECTION_SIZE),
        })
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; PACKAGE_HEADER_SIZE];
        layout::read_record(&mut reader, &mut buf, "Package header")?;
        Self::from_bytes(&buf)
    }
}

/// Per-item info record, stored right after each entry's name block
///
/// Layout (64 bytes):
/// - Seed: int32
/// - Zero: int32, must be 0
/// - Data Offset: uint32 (relative to the data section)
/// - Compressed Size: int32
/// - Decompressed Size: int32
/// - Is Compressed: 4-byte boolean
/// - Creation Time, Creation Time (copy), Last Access Time,
///   Modified Time, Modified Time (copy): FILETIME each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub seed: i32,
    pub zero: u32,
    pub offset: u32,
    pub compressed_size: u32,
    pub decompressed_size: u32,
    pub is_compressed: bool,
    pub creation_time: FileTime,
    pub creation_time2: FileTime,
    pub last_access_time: FileTime,
    pub modified_time: FileTime,
    pub modified_time2: FileTime,
}

impl ItemInfo {
    const SEED: Field = Field::new("seed", 0, 4);
    const ZERO: Field = Field::new("zero", 4, 4);
    const OFFSET: Field = Field::new("offset", 8, 4);
    const COMPRESSED_SIZE: Field = Field::new("compressed_size", 12, 4);
    const DECOMPRESSED_SIZE: Field = Field::new("decompressed_size", 16, 4);
    const IS_COMPRESSED: Field = Field::new("is_compressed", 20, 4);
    const CREATION_TIME: Field = Field::new("creation_time", 24, 8);
    const CREATION_TIME2: Field = Field::new("creation_time2", 32, 8);
    const LAST_ACCESS_TIME: Field = Field::new("last_access_time", 40, 8);
    const MODIFIED_TIME: Field = Field::new("modified_time", 48, 8);
    const MODIFIED_TIME2: Field = Field::new("modified_time2", 56, 8);

    pub const FIELDS: &'static [Field] = &[
        Self::SEED,
        Self::ZERO,
        Self::OFFSET,
        Self::COMPRESSED_SIZE,
        Self::DECOMPRESSED_SIZE,
        Self::IS_COMPRESSED,
        Self::CREATION_TIME,
        Self::CREATION_TIME2,
        Self::LAST_ACCESS_TIME,
        Self::MODIFIED_TIME,
        Self::MODIFIED_TIME2,
    ];

    pub fn to_bytes(&self) -> [u8; ITEM_INFO_SIZE] {
        let mut buf = [0u8; ITEM_INFO_SIZE];
        layout::put_i32(&mut buf, Self::SEED, self.seed);
        layout::put_u32(&mut buf, Self::ZERO, self.zero);
        layout::put_u32(&mut buf, Self::OFFSET, self.offset);
        layout::put_u32(&mut buf, Self::COMPRESSED_SIZE, self.compressed_size);
        layout::put_u32(&mut buf, Self::DECOMPRESSED_SIZE, self.decompressed_size);
        layout::put_u32(&mut buf, Self::IS_COMPRESSED, u32::from(self.is_compressed));
        layout::put_i64(&mut buf, Self::CREATION_TIME, self.creation_time.raw());
        layout::put_i64(&mut buf, Self::CREATION_TIME2, self.creation_time2.raw());
        layout::put_i64(&mut buf, Self::LAST_ACCESS_TIME, self.last_access_time.raw());
        layout::put_i64(&mut buf, Self::MODIFIED_TIME, self.modified_time.raw());
        layout::put_i64(&mut buf, Self::MODIFIED_TIME2, self.modified_time2.raw());
        buf
    }

    /// Decode the record starting at `offset` in `buf`
    pub fn from_bytes(buf: &[u8], offset: usize) -> Result<Self> {
        let buf = buf.get(offset..).unwrap_or_default();
        layout::ensure_len(buf, ITEM_INFO_SIZE, "Item info")?;

        let time = |field| FileTime::from_raw(layout::get_i64(buf, field));
        Ok(Self {
            seed: layout::get_i32(buf, Self::SEED),
            zero: layout::get_u32(buf, Self::ZERO),
            offset: layout::get_u32(buf, Self::OFFSET),
            compressed_size: layout::get_u32(buf, Self::COMPRESSED_SIZE),
            decompressed_size: layout::get_u32(buf, Self::DECOMPRESSED_SIZE),
            is_compressed: layout::get_u32(buf, Self::IS_COMPRESSED) != 0,
            creation_time: time(Self::CREATION_TIME),
            creation_time2: time(Self::CREATION_TIME2),
            last_access_time: time(Self::LAST_ACCESS_TIME),
            modified_time: time(Self::MODIFIED_TIME),
            modified_time2: time(Self::MODIFIED_TIME2),
        })
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }
}
