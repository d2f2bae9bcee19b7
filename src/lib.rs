//! packfile-rs: reader and writer for PACK game asset containers
//!
//! A pack is a single file holding many named entries. Each entry is
//! optionally zlib-compressed and then XOR-obfuscated with a keystream from a
//! seeded Mersenne Twister. This crate provides:
//! - Parsing of the header and index, with lookup by normalized name
//! - Streaming extraction (raw, decrypted, or fully decoded)
//! - In-place rewriting of metadata (names, timestamps, revision, root)
//! - Creation of new packs from arbitrary byte streams
//!
//! # Example
//!
//! ```no_run
//! use packfile_rs::{PackReader, PackWriter};
//!
//! // Create a pack
//! let mut writer = PackWriter::new(1, "data")?;
//! writer.write(&b"Hello, World!"[..], "text\\hello.txt")?;
//! writer.save("example.pack")?;
//!
//! // Read from the pack, names match case- and separator-insensitively
//! let mut reader = PackReader::open("example.pack")?;
//! let data = reader.read_entry("TEXT/HELLO.TXT")?;
//! assert_eq!(data, b"Hello, World!");
//! # Ok::<(), packfile_rs::error::PackError>(())
//! ```

// Core modules
pub mod archive;
pub mod crypto;
pub mod error;
pub mod summary;

// Re-export commonly used types
pub use archive::{
    normalize_name, EntryOptions, EntryStream, FileTime, PackEntry, PackReader, PackWriter,
    RangeView, MAGIC, MAX_ROOT_LENGTH,
};
pub use crypto::{CryptoStream, MersenneTwister, DEFAULT_MT_SEED};
pub use error::{ErrorKind, PackError, Result};
pub use summary::{EntrySummary, PackSummary};
