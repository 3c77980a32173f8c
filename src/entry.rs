use std::io::{Read, Write};

use serde::Serialize;

use crate::error::{Result, Section, StarError};
use crate::wire;

/// Fixed portion of a serialized entry header: size, offset, path length.
pub const ENTRY_FIXED_LEN: u64 = 24;

// ── EntryHeader ───────────────────────────────────────────────────────────────

/// Per-file header: payload size, absolute data-block offset, and the opaque
/// path bytes. On disk the path field carries a trailing NUL and the length
/// field counts it; in memory the path is held without the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub size: u64,
    pub offset: u64,
    pub path: Vec<u8>,
}

impl EntryHeader {
    pub fn new(path: impl Into<Vec<u8>>, size: u64) -> Self {
        Self { size, offset: 0, path: path.into() }
    }

    /// On-disk length of the path field: the stored bytes plus the NUL.
    pub fn path_len(&self) -> u64 {
        self.path.len() as u64 + 1
    }

    /// Serialized size of this header: three u64 fields plus the path field.
    pub fn encoded_len(&self) -> u64 {
        ENTRY_FIXED_LEN + self.path_len()
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        wire::write_u64(&mut writer, self.size)?;
        wire::write_u64(&mut writer, self.offset)?;
        wire::write_u64(&mut writer, self.path_len())?;
        wire::write_all_or(&mut writer, &self.path)?;
        wire::write_all_or(&mut writer, &[0])
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let size = wire::read_u64(&mut reader, Section::EntryHeader)?;
        let offset = wire::read_u64(&mut reader, Section::EntryHeader)?;
        let path_len = wire::read_u64(&mut reader, Section::EntryHeader)?;
        if path_len == 0 {
            return Err(StarError::InvalidPathLength(path_len));
        }
        let mut path = wire::read_vec(&mut reader, path_len, Section::Path)?;
        path.pop(); // drop the stored terminator
        Ok(Self { size, offset, path })
    }
}

// ── Entry ─────────────────────────────────────────────────────────────────────

/// A populated archive slot: an entry header plus its owned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub header: EntryHeader,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(path: impl Into<Vec<u8>>, data: Vec<u8>) -> Self {
        let header = EntryHeader::new(path, data.len() as u64);
        Self { header, data }
    }

    pub fn path(&self) -> &[u8] { &self.header.path }
    pub fn size(&self) -> u64 { self.header.size }
    pub fn offset(&self) -> u64 { self.header.offset }
    pub fn data(&self) -> &[u8] { &self.data }
}

// ── FileInfo ──────────────────────────────────────────────────────────────────

/// Lightweight descriptor returned by [`Archive::list`](crate::Archive::list).
/// The path is decoded lossily for display; the archive itself stores opaque
/// bytes.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub index: usize,
    pub path: String,
    pub size: u64,
    pub offset: u64,
}

impl FileInfo {
    pub(crate) fn new(index: usize, entry: &Entry) -> Self {
        Self {
            index,
            path: String::from_utf8_lossy(entry.path()).into_owned(),
            size: entry.size(),
            offset: entry.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip_keeps_fields() {
        let mut hdr = EntryHeader::new("dir/file1", 42);
        hdr.offset = 99;
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, hdr.encoded_len());
        assert_eq!(buf.last(), Some(&0)); // stored terminator
        assert_eq!(EntryHeader::read(&buf[..]).unwrap(), hdr);
    }

    #[test]
    fn path_len_counts_the_terminator() {
        assert_eq!(EntryHeader::new("abc", 0).path_len(), 4);
        assert_eq!(EntryHeader::new("", 0).path_len(), 1);
    }

    #[test]
    fn interior_nul_bytes_survive() {
        let hdr = EntryHeader::new(b"a\0b".to_vec(), 0);
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        assert_eq!(EntryHeader::read(&buf[..]).unwrap().path, b"a\0b");
    }

    #[test]
    fn zero_path_len_is_rejected() {
        let err = EntryHeader::read(&[0u8; 24][..]).unwrap_err();
        assert!(matches!(err, StarError::InvalidPathLength(0)));
    }

    #[test]
    fn truncated_path_is_tagged() {
        let hdr = EntryHeader::new("abcdef", 0);
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        buf.truncate(buf.len() - 3);
        let err = EntryHeader::read(&buf[..]).unwrap_err();
        assert!(matches!(err, StarError::TruncatedInput(Section::Path)));
    }
}
