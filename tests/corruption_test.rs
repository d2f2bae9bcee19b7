//! Corruption detection suite
//!
//! Tests for detecting and handling corrupted pack files.

use packfile_rs::archive::{
    encoded_name_len, FILE_HEADER_SIZE, INDEX_OFFSET, PACKAGE_HEADER_SIZE,
};
use packfile_rs::{EntryOptions, ErrorKind, PackError, PackReader, PackWriter};
use std::fs::OpenOptions;
use std::io::{Cursor, Seek, SeekFrom, Write};
use tempfile::NamedTempFile;

/// Offset of the 16 reserved bytes at the end of the package header
const RESERVED_OFFSET: usize = FILE_HEADER_SIZE + PACKAGE_HEADER_SIZE - 16;

/// Helper: Create a valid test pack in memory
fn create_test_pack() -> Vec<u8> {
    let mut writer = PackWriter::new(1, "data").unwrap();
    writer.write(&b"Hello, World!"[..], "test.txt").unwrap();
    writer.write(&vec![0xAB; 1024][..], "data.bin").unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();
    bytes
}

/// Helper: Corrupt bytes at specific offset in a file
fn corrupt_byte_at(path: &std::path::Path, offset: u64, new_value: u8) {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(&[new_value]).unwrap();
}

fn parse(bytes: Vec<u8>) -> packfile_rs::Result<PackReader<Cursor<Vec<u8>>>> {
    PackReader::new(Cursor::new(bytes))
}

#[test]
fn test_valid_pack_parses() {
    let mut reader = parse(create_test_pack()).unwrap();
    assert_eq!(reader.read_entry("test.txt").unwrap(), b"Hello, World!");
}

#[test]
fn test_corrupted_magic_every_byte() {
    let original = create_test_pack();

    for offset in 0..8 {
        let mut bytes = original.clone();
        bytes[offset] ^= 0xFF;

        match parse(bytes) {
            Err(err @ PackError::InvalidMagic(_)) => assert_eq!(err.kind(), ErrorKind::Format),
            other => panic!(
                "Expected InvalidMagic for byte {}, got: {:?}",
                offset,
                other.map(|_| ())
            ),
        }
    }
}

#[test]
fn test_corrupted_reserved_every_byte() {
    let original = create_test_pack();

    for offset in RESERVED_OFFSET..RESERVED_OFFSET + 16 {
        let mut bytes = original.clone();
        bytes[offset] = 0x01;

        match parse(bytes) {
            Err(err @ PackError::CorruptHeader) => assert_eq!(err.kind(), ErrorKind::Format),
            other => panic!(
                "Expected CorruptHeader for byte {}, got: {:?}",
                offset,
                other.map(|_| ())
            ),
        }
    }
}

#[test]
fn test_corrupted_magic_on_disk() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), create_test_pack()).unwrap();
    corrupt_byte_at(temp_file.path(), 0, b'X');

    let err = PackReader::open(temp_file.path()).err().unwrap();
    assert!(matches!(err, PackError::InvalidMagic([b'X', b'A', b'C', b'K', ..])));
}

#[test]
fn test_corrupted_zero_field_names_entry() {
    let mut bytes = create_test_pack();
    // second record: first name block, first item info, second name block, then seed
    let zero_field = INDEX_OFFSET as usize + encoded_name_len("test.txt") + 64 + encoded_name_len("data.bin") + 4;
    bytes[zero_field] = 0x7F;

    match parse(bytes) {
        Err(PackError::CorruptEntry { index, name }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "data.bin");
        }
        other => panic!("Expected CorruptEntry, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_truncated_header() {
    let bytes = create_test_pack();

    for len in [0, 7, 100, FILE_HEADER_SIZE - 1, FILE_HEADER_SIZE + 10] {
        let err = parse(bytes[..len].to_vec()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Format, "length {}: {}", len, err);
    }
}

#[test]
fn test_truncated_index() {
    let bytes = create_test_pack();
    let err = parse(bytes[..INDEX_OFFSET as usize + 30].to_vec()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_entry_count_beyond_index() {
    let mut bytes = create_test_pack();
    // package header entry count
    bytes[FILE_HEADER_SIZE] = 50;

    let err = parse(bytes).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_invalid_utf8_name() {
    let mut bytes = create_test_pack();
    // first byte of the first name
    bytes[INDEX_OFFSET as usize + 1] = 0xFF;

    let err = parse(bytes).err().unwrap();
    assert!(matches!(err, PackError::InvalidFormat(_)));
}

#[test]
fn test_corrupted_payload_fails_on_extract_only() {
    let mut bytes = create_test_pack();
    let reader = parse(bytes.clone()).unwrap();
    let start = (reader.data_start() + reader.get("data.bin").unwrap().data_offset) as usize;
    let len = reader.get("data.bin").unwrap().size_in_pack as usize;

    for b in &mut bytes[start..start + len] {
        *b ^= 0x5A;
    }

    let mut reader = parse(bytes).unwrap();
    assert_eq!(reader.read_entry("test.txt").unwrap(), b"Hello, World!");
    let err = reader.read_entry("data.bin").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_truncated_payload_is_short_read() {
    let mut writer = PackWriter::new(1, "").unwrap();
    writer
        .write_with(&vec![0x11; 1024][..], "stored.bin", &EntryOptions::new(4).with_compress(false))
        .unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();
    bytes.truncate(bytes.len() - 100);

    // the pack still lists the entry, reading it stops at the end of the store
    let mut reader = parse(bytes).unwrap();
    assert_eq!(reader.get("stored.bin").unwrap().size_in_pack, 1024);
    assert_eq!(reader.read_entry("stored.bin").unwrap(), vec![0x11; 924]);
}
