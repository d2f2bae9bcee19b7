//! Integration tests for packfile-rs

use packfile_rs::archive::{encoded_name_len, INDEX_OFFSET, ITEM_INFO_SIZE};
use packfile_rs::{EntryOptions, FileTime, PackReader, PackSummary, PackWriter};
use rand::{Rng, RngCore, SeedableRng};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tempfile::NamedTempFile;

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

#[test]
fn test_basic_pack_roundtrip() {
    let temp_file = NamedTempFile::new().unwrap();
    let pack_path = temp_file.path();
    let binary = random_bytes(10_000, 1);

    // Create pack
    {
        let mut writer = PackWriter::new(7, "data").unwrap();
        writer.write(&b"hello"[..], "a.txt").unwrap();
        writer.write(&binary[..], "dir/b.bin").unwrap();
        writer.save(pack_path).unwrap();
    }

    // Read pack
    {
        let mut reader = PackReader::open(pack_path).unwrap();
        assert_eq!(reader.revision(), 7);
        assert_eq!(reader.root(), "data");
        assert_eq!(reader.len(), 2);

        let names: Vec<&str> = reader.entries().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a.txt", "dir/b.bin"]);

        assert_eq!(reader.read_entry("a.txt").unwrap(), b"hello");
        assert_eq!(reader.read_entry("DIR\\B.BIN").unwrap(), binary);

        let entry = reader.get("a.txt").unwrap();
        assert_eq!(entry.seed, 7);
        assert!(entry.is_compressed);
        assert_eq!(entry.decompressed_size, 5);
        assert_eq!(entry.data_offset, 0);
    }
}

#[test]
fn test_mixed_entry_options() {
    let created = FileTime::from_raw(130_000_000_000_000_000);
    let modified = FileTime::from_raw(130_500_000_000_000_000);
    let accessed = FileTime::from_raw(131_000_000_000_000_000);
    let text = b"This is test data that should compress well. ".repeat(100);

    let mut writer = PackWriter::new(3, "").unwrap();
    writer
        .write_with(&text[..], "stored.txt", &EntryOptions::new(-12345).with_compress(false))
        .unwrap();
    writer
        .write_with(
            &text[..],
            "compressed.txt",
            &EntryOptions::new(i32::MAX)
                .with_created(created)
                .with_modified(modified)
                .with_accessed(accessed),
        )
        .unwrap();

    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();
    let mut reader = PackReader::new(Cursor::new(bytes)).unwrap();

    let stored = reader.get("stored.txt").unwrap();
    assert_eq!(stored.seed, -12345);
    assert!(!stored.is_compressed);
    assert_eq!(stored.size_in_pack as usize, text.len());

    let compressed = reader.get("compressed.txt").unwrap().clone();
    assert!(compressed.size_in_pack < compressed.decompressed_size);
    assert_eq!(compressed.created, created);
    assert_eq!(compressed.modified, modified);
    assert_eq!(compressed.accessed, accessed);

    assert_eq!(reader.read_entry("stored.txt").unwrap(), text);
    assert_eq!(reader.read_entry("compressed.txt").unwrap(), text);
}

#[test]
fn test_name_size_classes() {
    let lengths = [1usize, 14, 15, 30, 62, 63, 94, 95, 200, 1000];
    let names: Vec<String> = lengths
        .iter()
        .map(|len| format!("{}x", "d/".repeat(*len / 2)).chars().take(*len).collect())
        .collect();

    let mut writer = PackWriter::new(1, "").unwrap();
    for (i, name) in names.iter().enumerate() {
        writer.write(format!("payload {i}").as_bytes(), name).unwrap();
    }
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();

    let mut reader = PackReader::new(Cursor::new(bytes)).unwrap();
    let index_len: usize = names
        .iter()
        .map(|n| encoded_name_len(n) + ITEM_INFO_SIZE)
        .sum();
    assert_eq!(reader.data_start(), INDEX_OFFSET + index_len as u64);

    for (i, name) in names.iter().enumerate() {
        let entry = reader.get(name).unwrap();
        assert_eq!(entry.name(), name);
        assert!(entry.max_name_length().unwrap() >= name.len());
        assert_eq!(
            reader.read_entry(name).unwrap(),
            format!("payload {i}").as_bytes()
        );
    }
}

#[test]
fn test_empty_entries() {
    let mut writer = PackWriter::new(1, "").unwrap();
    writer.write(&b""[..], "empty.z").unwrap();
    writer
        .write_with(&b""[..], "empty.raw", &EntryOptions::new(1).with_compress(false))
        .unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();

    let mut reader = PackReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.get("empty.raw").unwrap().size_in_pack, 0);
    // zlib framing is never empty
    assert!(reader.get("empty.z").unwrap().size_in_pack > 0);
    assert!(reader.read_entry("empty.z").unwrap().is_empty());
    assert!(reader.read_entry("empty.raw").unwrap().is_empty());
}

#[test]
fn test_streaming_large_entry() {
    let data = random_bytes(1024 * 1024 + 17, 2);
    let mut writer = PackWriter::new(9, "big").unwrap();
    writer.write(&data[..], "big.bin").unwrap();
    writer.write(&b"tail"[..], "tail.txt").unwrap();

    let temp_file = NamedTempFile::new().unwrap();
    writer.save(temp_file.path()).unwrap();

    let mut reader = PackReader::open(temp_file.path()).unwrap();
    let mut stream = reader.extract("big.bin").unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let mut out = Vec::with_capacity(data.len());
    let mut chunk = vec![0u8; 8192];
    loop {
        let want = rng.gen_range(1..chunk.len());
        let n = stream.read(&mut chunk[..want]).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(out, data);

    // The stream released the store; the next entry still reads correctly
    assert_eq!(reader.read_entry("tail.txt").unwrap(), b"tail");
}

#[test]
fn test_raw_bytes_are_obfuscated() {
    let plain = b"a perfectly readable sentence stored without compression".to_vec();
    let mut writer = PackWriter::new(1, "").unwrap();
    writer
        .write_with(&plain[..], "p.txt", &EntryOptions::new(77).with_compress(false))
        .unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();

    assert!(!bytes.windows(plain.len()).any(|w| w == plain.as_slice()));

    let mut reader = PackReader::new(Cursor::new(bytes)).unwrap();
    let mut raw = reader.extract_raw("p.txt").unwrap();
    assert_eq!(raw.len(), plain.len() as u64);
    let mut stored = Vec::new();
    raw.read_to_end(&mut stored).unwrap();
    assert_ne!(stored, plain);
}

#[test]
fn test_raw_stream_matches_store_bytes() {
    let mut writer = PackWriter::new(1, "").unwrap();
    writer.write(&b"one"[..], "1").unwrap();
    writer.write(&b"two"[..], "2").unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();

    let mut reader = PackReader::new(Cursor::new(bytes)).unwrap();
    let data_start = reader.data_start();
    let second = reader.get("2").unwrap().clone();
    let mut raw = Vec::new();
    reader.extract_raw("2").unwrap().read_to_end(&mut raw).unwrap();

    let mut store = reader.into_inner();
    store
        .seek(SeekFrom::Start(data_start + second.data_offset))
        .unwrap();
    let mut stored = vec![0u8; second.size_in_pack as usize];
    store.read_exact(&mut stored).unwrap();
    assert_eq!(stored, raw);
}

#[test]
fn test_summary_json() {
    let mut writer = PackWriter::new(11, "res").unwrap();
    writer.write(&b"abc"[..], "Sub\\File.TXT").unwrap();
    let mut bytes = Vec::new();
    writer.save_to(&mut bytes).unwrap();

    let reader = PackReader::new(Cursor::new(bytes)).unwrap();
    let summary = reader.summary();
    assert_eq!(summary.revision, 11);
    assert_eq!(summary.root, "res");
    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].name, "Sub\\File.TXT");
    assert_eq!(summary.entries[0].key, "SUB/FILE.TXT");
    assert_eq!(summary.decoded_bytes(), 3);

    let json = summary.to_json().unwrap();
    assert_eq!(PackSummary::from_json(&json).unwrap(), summary);
}
