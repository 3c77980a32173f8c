//! Little-endian integer codec and the bounded I/O helpers every
//! (de)serializer in the crate goes through. All on-wire integers are
//! unsigned and little-endian regardless of host byte order.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Read, Write};

use crate::error::{Result, Section, StarError};

/// Widest integer the wire format carries, in bytes.
pub const MAX_WIDTH: usize = 8;

pub(crate) const U64_WIDTH: usize = 8;

/// Encode `value` into exactly `out.len()` little-endian bytes.
/// Values wider than the requested width are truncated to fit.
pub fn encode_uint(value: u64, out: &mut [u8]) -> Result<()> {
    let width = out.len();
    if width > MAX_WIDTH {
        return Err(StarError::UnsupportedWidth(width));
    }
    if width == 0 {
        return Ok(());
    }
    LittleEndian::write_uint(out, mask(value, width), width);
    Ok(())
}

/// Decode `bytes.len()` little-endian bytes into an unsigned integer.
/// An empty slice decodes to 0.
pub fn decode_uint(bytes: &[u8]) -> Result<u64> {
    let width = bytes.len();
    if width > MAX_WIDTH {
        return Err(StarError::UnsupportedWidth(width));
    }
    if width == 0 {
        return Ok(0);
    }
    Ok(LittleEndian::read_uint(bytes, width))
}

fn mask(value: u64, width: usize) -> u64 {
    if width >= MAX_WIDTH {
        value
    } else {
        value & ((1u64 << (8 * width)) - 1)
    }
}

// read_exact with EOF reported as a truncation in `section`.
pub(crate) fn read_exact_or<R: Read>(r: &mut R, buf: &mut [u8], section: Section) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => StarError::TruncatedInput(section),
        _ => StarError::Io(e),
    })
}

// write_all with a full sink reported as a short output.
pub(crate) fn write_all_or<W: Write>(w: &mut W, buf: &[u8]) -> Result<()> {
    w.write_all(buf).map_err(|e| match e.kind() {
        io::ErrorKind::WriteZero => StarError::TruncatedOutput,
        _ => StarError::Io(e),
    })
}

pub(crate) fn read_u64<R: Read>(r: &mut R, section: Section) -> Result<u64> {
    let mut buf = [0u8; U64_WIDTH];
    read_exact_or(r, &mut buf, section)?;
    decode_uint(&buf)
}

pub(crate) fn write_u64<W: Write>(w: &mut W, value: u64) -> Result<()> {
    let mut buf = [0u8; U64_WIDTH];
    encode_uint(value, &mut buf)?;
    write_all_or(w, &buf)
}

/// Read exactly `len` bytes into an owned buffer. The buffer grows only as
/// bytes actually arrive, so a corrupt length field cannot force a huge
/// up-front allocation.
pub(crate) fn read_vec<R: Read>(r: &mut R, len: u64, section: Section) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let got = r.by_ref().take(len).read_to_end(&mut buf)?;
    if (got as u64) < len {
        return Err(StarError::TruncatedInput(section));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_codec_roundtrips_every_width() {
        let value = 0x0123_4567_89ab_cdef_u64;
        for width in 0..=MAX_WIDTH {
            let mut buf = vec![0u8; width];
            encode_uint(value, &mut buf).unwrap();
            let expect = if width == MAX_WIDTH {
                value
            } else {
                value & ((1u64 << (8 * width)) - 1)
            };
            assert_eq!(decode_uint(&buf).unwrap(), expect, "width {width}");
        }
    }

    #[test]
    fn encoding_is_little_endian() {
        let mut buf = [0u8; 8];
        encode_uint(0x0807_0605_0403_0201, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn narrow_widths_truncate_high_bits() {
        let mut buf = [0u8; 2];
        encode_uint(0x0001_ffee, &mut buf).unwrap();
        assert_eq!(buf, [0xee, 0xff]);
        assert_eq!(decode_uint(&buf).unwrap(), 0xffee);
    }

    #[test]
    fn width_above_eight_is_rejected() {
        let mut buf = [0u8; 9];
        assert!(matches!(encode_uint(1, &mut buf), Err(StarError::UnsupportedWidth(9))));
        assert!(matches!(decode_uint(&buf), Err(StarError::UnsupportedWidth(9))));
    }

    #[test]
    fn short_reads_carry_their_section() {
        let mut input: &[u8] = &[1, 2, 3];
        let err = read_u64(&mut input, Section::Header).unwrap_err();
        assert!(matches!(err, StarError::TruncatedInput(Section::Header)));
    }

    #[test]
    fn read_vec_detects_truncation() {
        let mut input: &[u8] = b"abc";
        let err = read_vec(&mut input, 5, Section::FileData).unwrap_err();
        assert!(matches!(err, StarError::TruncatedInput(Section::FileData)));

        let mut input: &[u8] = b"abcde";
        assert_eq!(read_vec(&mut input, 5, Section::FileData).unwrap(), b"abcde");
    }
}
