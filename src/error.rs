use std::fmt;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StarError>;

/// Stage of the serialized layout an input ran out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    EntryHeader,
    Path,
    FileData,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Header => "archive header",
            Section::EntryHeader => "entry header",
            Section::Path => "entry path",
            Section::FileData => "file data",
        })
    }
}

#[derive(Error, Debug)]
pub enum StarError {
    #[error("invalid magic number: expected \"STAR\", found 0x{}", hex::encode(.found))]
    InvalidMagic { found: [u8; 4] },
    #[error("truncated archive: input ended inside the {0}")]
    TruncatedInput(Section),
    #[error("output stream too short for the serialized archive")]
    TruncatedOutput,
    #[error("an archive must hold at least one file")]
    ZeroFileCount,
    #[error("file index {index} out of range for an archive of {count}")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("file slot {0} was never populated")]
    MissingEntry(usize),
    #[error("entry path length field is {0}, expected at least 1")]
    InvalidPathLength(u64),
    #[error("integer width {0} exceeds the 8-byte wire maximum")]
    UnsupportedWidth(usize),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
