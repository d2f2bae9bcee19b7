/// Basic example demonstrating pack creation and reading
///
/// Run with: cargo run --example basic
use anyhow::Context;
use packfile_rs::{EntryOptions, PackReader, PackWriter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== packfile-rs Basic Example ===\n");

    // Create a pack
    println!("1. Creating pack...");
    create_pack()?;

    // Read from the pack
    println!("\n2. Reading from pack...");
    read_pack()?;

    println!("\n✓ Example complete!");
    Ok(())
}

fn create_pack() -> anyhow::Result<()> {
    let mut writer = PackWriter::new(1, "data")?;

    // Entries default to the revision as seed, compressed, timestamped now
    writer.write(
        &b"This is a readme file for the basic example."[..],
        "readme.txt",
    )?;
    writer.write(
        &br#"{"name": "Basic Example", "version": "1.0.0"}"#[..],
        "db\\info.json",
    )?;

    // Per-entry options: a different seed, stored without compression
    writer.write_with(
        &[0u8; 1000][..],
        "binary.dat",
        &EntryOptions::new(1234).with_compress(false),
    )?;

    writer
        .save("example_basic.pack")
        .context("writing example_basic.pack")?;
    println!("   ✓ Pack created: example_basic.pack");

    Ok(())
}

fn read_pack() -> anyhow::Result<()> {
    let mut reader = PackReader::open("example_basic.pack")?;

    // List all entries
    println!("   Entries in pack (root '{}'):", reader.root());
    for entry in reader.entries() {
        println!(
            "     - {} ({} -> {} bytes)",
            entry.name(),
            entry.size_in_pack,
            entry.decompressed_size
        );
    }

    // Read specific entry
    println!("\n   Reading readme.txt:");
    let readme = reader.read_entry("README.TXT")?;
    println!("     {}", String::from_utf8_lossy(&readme));

    // Lookup ignores case and separator style
    println!("\n   Reading db/info.json:");
    let json_data = reader.read_entry("db/info.json")?;
    println!("     {}", String::from_utf8_lossy(&json_data));

    Ok(())
}
