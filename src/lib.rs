//! STAR: a minimal tar-like archive container.
//!
//! An archive is a fixed count of named byte payloads serialized front to
//! back: a 12-byte header, one entry header per file, then the raw data
//! blocks, contiguous and unpadded. All on-wire integers are little-endian
//! u64. See [`Archive`] for the embedding surface.

pub mod archive;
pub mod entry;
pub mod error;
pub mod header;
pub mod order;
pub mod stream;
pub mod wire;

pub use archive::Archive;
pub use entry::{Entry, EntryHeader, FileInfo, ENTRY_FIXED_LEN};
pub use error::{Result, Section, StarError};
pub use header::{ArchiveHeader, HEADER_LEN, MAGIC};
pub use order::path_cmp;
pub use stream::Stream;
