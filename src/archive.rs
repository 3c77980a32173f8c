//! High-level [`Archive`] API — the primary embedding surface.
//!
//! An archive is a fixed count of file slots, populated independently by
//! index, then serialized front to back: the 12-byte header, every entry
//! header in index order, then every data block in index order with no
//! padding between blocks.
//!
//! ```
//! use star::{Archive, Stream};
//!
//! let mut ar = Archive::new(2)?;
//! ar.add_file(0, "greeting.txt", 5, &b"hello"[..])?;
//! ar.add_file(1, "empty.bin", 0, &b""[..])?;
//! ar.compute_offsets()?;
//!
//! let mut sink = Stream::memory_zeroed(ar.encoded_len()? as usize);
//! ar.write(&mut sink)?;
//!
//! let bytes = sink.into_bytes().unwrap();
//! let back = Archive::read(&bytes[..])?;
//! assert_eq!(back.entry(0).unwrap().data(), b"hello");
//! # Ok::<(), star::StarError>(())
//! ```

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::entry::{Entry, EntryHeader, FileInfo};
use crate::error::{Result, Section, StarError};
use crate::header::{ArchiveHeader, HEADER_LEN};
use crate::order::path_cmp;
use crate::wire;

// ── Archive ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Archive {
    header: ArchiveHeader,
    slots: Vec<Option<Entry>>,
}

impl Archive {
    // ── Build ────────────────────────────────────────────────────────────────

    /// Create an empty archive with `file_count` unpopulated slots.
    pub fn new(file_count: u64) -> Result<Self> {
        if file_count == 0 {
            return Err(StarError::ZeroFileCount);
        }
        let slots = vec![None; file_count as usize];
        Ok(Self { header: ArchiveHeader::new(file_count), slots })
    }

    /// Read exactly `size` bytes from `source` into slot `index`. Re-adding
    /// at an occupied index replaces the previous entry. A source that runs
    /// out before `size` bytes fails the call; extra source bytes are left
    /// unread.
    pub fn add_file<R: Read>(
        &mut self,
        index: usize,
        path: impl Into<Vec<u8>>,
        size: u64,
        mut source: R,
    ) -> Result<()> {
        if index >= self.slots.len() {
            return Err(StarError::IndexOutOfRange { index, count: self.slots.len() });
        }
        let path = path.into();
        let data = wire::read_vec(&mut source, size, Section::FileData)?;
        tracing::trace!(index, size, path = %String::from_utf8_lossy(&path), "adding file");
        self.slots[index] = Some(Entry::new(path, data));
        Ok(())
    }

    // ── Offsets ──────────────────────────────────────────────────────────────

    /// Assign every entry its absolute data-block position. The first block
    /// sits immediately after the serialized headers; each subsequent block
    /// follows the previous one. Index order, not name order.
    pub fn compute_offsets(&mut self) -> Result<()> {
        if let Some(index) = self.first_missing() {
            return Err(StarError::MissingEntry(index));
        }
        let mut offset = HEADER_LEN;
        for entry in self.slots.iter().flatten() {
            offset += entry.header.encoded_len();
        }
        for entry in self.slots.iter_mut().flatten() {
            entry.header.offset = offset;
            offset += entry.header.size;
        }
        tracing::trace!(total = offset, "computed entry offsets");
        Ok(())
    }

    /// Total serialized size: header, entry headers, then data.
    pub fn encoded_len(&self) -> Result<u64> {
        if let Some(index) = self.first_missing() {
            return Err(StarError::MissingEntry(index));
        }
        let mut len = HEADER_LEN;
        for entry in self.slots.iter().flatten() {
            len += entry.header.encoded_len() + entry.header.size;
        }
        Ok(len)
    }

    // ── Serialize ────────────────────────────────────────────────────────────

    /// Write the archive: header, all entry headers, all data blocks.
    /// Every slot must be populated.
    pub fn write<W: Write>(&self, mut sink: W) -> Result<()> {
        if let Some(index) = self.first_missing() {
            return Err(StarError::MissingEntry(index));
        }
        self.header.write(&mut sink)?;
        for entry in self.slots.iter().flatten() {
            entry.header.write(&mut sink)?;
        }
        for entry in self.slots.iter().flatten() {
            wire::write_all_or(&mut sink, &entry.data)?;
        }
        tracing::debug!(files = self.slots.len(), "serialized archive");
        Ok(())
    }

    // ── Deserialize ──────────────────────────────────────────────────────────

    /// Strict all-or-nothing read: header, then every entry header, then
    /// every data block, sequentially. Any failure drops everything read so
    /// far and returns the error.
    pub fn read<R: Read>(mut source: R) -> Result<Self> {
        let header = ArchiveHeader::read(&mut source)?;
        if header.file_count == 0 {
            return Err(StarError::ZeroFileCount);
        }
        tracing::debug!(files = header.file_count, "read archive header");

        let mut headers = Vec::new();
        for _ in 0..header.file_count {
            headers.push(EntryHeader::read(&mut source)?);
        }

        let mut slots = Vec::with_capacity(headers.len());
        for entry_header in headers {
            let data = wire::read_vec(&mut source, entry_header.size, Section::FileData)?;
            tracing::trace!(
                size = entry_header.size,
                path = %String::from_utf8_lossy(&entry_header.path),
                "read entry"
            );
            slots.push(Some(Entry { header: entry_header, data }));
        }
        Ok(Self { header, slots })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn file_count(&self) -> u64 {
        self.slots.len() as u64
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Iterate populated slots with their indices.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (i, e)))
    }

    /// Descriptors for every populated slot, for display or JSON output.
    pub fn list(&self) -> Vec<FileInfo> {
        self.entries().map(|(i, e)| FileInfo::new(i, e)).collect()
    }

    fn first_missing(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    // ── Lookup ───────────────────────────────────────────────────────────────

    /// Scan populated slots for an exact byte-for-byte path match. Works on
    /// any archive; this is the default lookup.
    pub fn linear_search(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        self.entries().find(|(_, e)| e.path() == name).map(|(i, _)| i)
    }

    /// Bisect for `name` with [`path_cmp`]. Requires a fully populated
    /// archive whose entries are sorted by [`sort_by_path`](Self::sort_by_path)
    /// (or were added in that order); on anything else the result is
    /// unspecified and present entries may be missed, though it never panics.
    /// Prefer [`linear_search`](Self::linear_search) unless the order is
    /// known.
    pub fn binary_search(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        let mut lo = 0;
        let mut hi = self.slots.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entry(mid)?;
            match path_cmp(entry.path(), name) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Reorder fully populated slots by [`path_cmp`] on their paths, making
    /// the archive bisectable. Offsets are stale afterwards; run
    /// [`compute_offsets`](Self::compute_offsets) again before serializing.
    pub fn sort_by_path(&mut self) -> Result<()> {
        if let Some(index) = self.first_missing() {
            return Err(StarError::MissingEntry(index));
        }
        self.slots.sort_by(|a, b| match (a, b) {
            (Some(x), Some(y)) => path_cmp(x.path(), y.path()),
            _ => Ordering::Equal,
        });
        Ok(())
    }
}
