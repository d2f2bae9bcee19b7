use std::io;
use thiserror::Error;

/// Result type for pack operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Broad classification of a [`PackError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container bytes do not describe a valid pack
    Format,
    /// A value falls outside the bounds a field or view allows
    Bounds,
    /// The operation is never supported by this object
    Unsupported,
    /// A named entry does not exist
    NotFound,
    /// The underlying store failed
    Io,
    /// Summary serialization failed
    Json,
}

/// Unified error type for all pack operations
#[derive(Debug, Error)]
pub enum PackError {
    // Format errors
    #[error("Not a valid pack file: bad signature {0:02x?}")]
    InvalidMagic([u8; 8]),

    #[error("Pack file is corrupted: reserved package header bytes are not zero")]
    CorruptHeader,

    #[error("Entry {index} ('{name}') is corrupted")]
    CorruptEntry { index: usize, name: String },

    #[error("Invalid pack format: {0}")]
    InvalidFormat(String),

    // Bounds errors
    #[error("Name too long: {len} bytes (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("Root path too long: {len} bytes (max {max})")]
    RootTooLong { len: usize, max: usize },

    #[error("Position {position} outside of range view of length {len}")]
    OutOfRange { position: i64, len: u64 },

    #[error("Entry too large for the pack format: {0} bytes")]
    EntryTooLarge(u64),

    // Capability errors
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Entry not found in pack: {0}")]
    EntryNotFound(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::InvalidMagic(_)
            | PackError::CorruptHeader
            | PackError::CorruptEntry { .. }
            | PackError::InvalidFormat(_) => ErrorKind::Format,
            PackError::NameTooLong { .. }
            | PackError::RootTooLong { .. }
            | PackError::OutOfRange { .. }
            | PackError::EntryTooLarge(_) => ErrorKind::Bounds,
            PackError::Unsupported(_) => ErrorKind::Unsupported,
            PackError::EntryNotFound(_) => ErrorKind::NotFound,
            PackError::Io(_) => ErrorKind::Io,
            PackError::Json(_) => ErrorKind::Json,
        }
    }
}

/// Recovers a `PackError` that travelled through a `Read`/`Seek` boundary
/// wrapped in an `io::Error`; anything else stays an I/O error.
impl From<io::Error> for PackError {
    fn from(err: io::Error) -> Self {
        let carries_pack_error = err
            .get_ref()
            .is_some_and(|inner| inner.is::<PackError>());
        if !carries_pack_error {
            return PackError::Io(err);
        }

        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<PackError>()) {
            Some(Ok(pack)) => *pack,
            Some(Err(inner)) => PackError::Io(io::Error::new(kind, inner)),
            None => PackError::Io(io::Error::from(kind)),
        }
    }
}

impl From<PackError> for io::Error {
    fn from(err: PackError) -> Self {
        let kind = match err.kind() {
            ErrorKind::Format => io::ErrorKind::InvalidData,
            ErrorKind::Bounds => io::ErrorKind::InvalidInput,
            ErrorKind::Unsupported => io::ErrorKind::Unsupported,
            ErrorKind::NotFound => io::ErrorKind::NotFound,
            ErrorKind::Json => io::ErrorKind::Other,
            ErrorKind::Io => match err {
                PackError::Io(inner) => return inner,
                _ => io::ErrorKind::Other,
            },
        };
        io::Error::new(kind, err)
    }
}
