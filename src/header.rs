use std::io::{Read, Write};

use crate::error::{Result, Section, StarError};
use crate::wire;

pub const MAGIC: &[u8; 4] = b"STAR";
/// Serialized header size: 4 magic bytes + 8-byte file count.
pub const HEADER_LEN: u64 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub magic: [u8; 4],
    pub file_count: u64,
}

impl ArchiveHeader {
    pub fn new(file_count: u64) -> Self {
        Self { magic: *MAGIC, file_count }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        wire::write_all_or(&mut writer, &self.magic)?;
        wire::write_u64(&mut writer, self.file_count)
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        wire::read_exact_or(&mut reader, &mut magic, Section::Header)?;
        if &magic != MAGIC {
            return Err(StarError::InvalidMagic { found: magic });
        }
        let file_count = wire::read_u64(&mut reader, Section::Header)?;
        Ok(Self { magic, file_count })
    }
}
