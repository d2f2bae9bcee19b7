mod entry;
mod filetime;
mod format;
mod index;
mod layout;
mod name;
mod pipeline;
mod reader;
mod segment;
mod writer;

pub use entry::{normalize_name, PackEntry};
pub use filetime::FileTime;
pub use format::{
    FileHeader, ItemInfo, PackageHeader, FILE_HEADER_SIZE, INDEX_OFFSET, ITEM_INFO_SIZE, MAGIC,
    MAX_ROOT_LENGTH, PACKAGE_HEADER_SIZE, ROOT_FIELD_SIZE,
};
pub use layout::{tiles_exactly, Field};
pub use name::{decode_name, encode_name, encode_name_padded, encoded_name_len, size_class, DecodedName};
pub use pipeline::EntryStream;
pub use reader::PackReader;
pub use segment::RangeView;
pub use writer::{EntryOptions, PackWriter};
