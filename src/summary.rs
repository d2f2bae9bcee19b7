//! Serializable listing of a pack
//!
//! Produced by [`PackReader::summary`](crate::PackReader::summary) for tools
//! that enumerate packs without touching entry payloads.

use crate::archive::{FileTime, PackEntry};
use crate::error::{PackError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pack-level metadata plus one record per entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub revision: u32,
    pub root: String,
    pub created: FileTime,
    pub modified: FileTime,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub name: String,
    pub key: String,
    pub seed: i32,
    pub is_compressed: bool,
    pub size_in_pack: u32,
    pub decompressed_size: u32,
    pub data_offset: u64,
    pub modified: FileTime,
    /// `modified` as UTC
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub modified_utc: Option<DateTime<Utc>>,
}

impl EntrySummary {
    pub fn new(key: &str, entry: &PackEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            key: key.to_string(),
            seed: entry.seed,
            is_compressed: entry.is_compressed,
            size_in_pack: entry.size_in_pack,
            decompressed_size: entry.decompressed_size,
            data_offset: entry.data_offset,
            modified: entry.modified,
            modified_utc: entry.modified.to_datetime(),
        }
    }
}

impl PackSummary {
    /// Total bytes the entries occupy in the data section
    pub fn stored_bytes(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.size_in_pack)).sum()
    }

    /// Total bytes after decoding every entry
    pub fn decoded_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.decompressed_size))
            .sum()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(PackError::from)
    }

    /// Parse from JSON
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(PackError::from)
    }
}
