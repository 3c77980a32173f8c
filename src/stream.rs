//! Byte-stream backends for archive I/O.
//!
//! The serializers in this crate are generic over [`Read`] / [`Write`];
//! `Stream` packages the two backends callers actually reach for: an owned
//! file handle, or an owned fixed-length in-memory buffer with a cursor.
//! Memory streams transfer at most the space remaining and never grow, so a
//! sink that is too small surfaces as a short write instead of silent
//! expansion. There is no `Seek`: the format is written and read strictly
//! front to back.

use std::fs::File;
use std::io::{self, Read, Write};

#[derive(Debug)]
pub enum Stream {
    File(File),
    Memory(MemoryStream),
}

#[derive(Debug)]
pub struct MemoryStream {
    buf: Vec<u8>,
    pos: usize,
}

impl Stream {
    /// Wrap an open file handle. The handle is owned and closed on drop.
    pub fn file(file: File) -> Self {
        Stream::File(file)
    }

    /// Wrap an owned buffer. Its current length is the stream's fixed
    /// length; reads and writes share one cursor starting at zero.
    pub fn memory(buf: Vec<u8>) -> Self {
        Stream::Memory(MemoryStream { buf, pos: 0 })
    }

    /// A zero-filled memory stream of `len` bytes, for collecting output.
    pub fn memory_zeroed(len: usize) -> Self {
        Self::memory(vec![0; len])
    }

    /// Release the backing resource (file handle or buffer).
    pub fn close(self) {}

    /// Recover the backing buffer of a memory stream; `None` for files.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Stream::File(_) => None,
            Stream::Memory(m) => Some(m.buf),
        }
    }

    /// Cursor position of a memory stream; `None` for files.
    pub fn position(&self) -> Option<usize> {
        match self {
            Stream::File(_) => None,
            Stream::Memory(m) => Some(m.pos),
        }
    }
}

impl Read for MemoryStream {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let n = data.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + n].copy_from_slice(&data[..n]);
        self.pos += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Stream {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::File(f) => f.read(out),
            Stream::Memory(m) => m.read(out),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            Stream::File(f) => f.write(data),
            Stream::Memory(m) => m.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::File(f) => f.flush(),
            Stream::Memory(m) => m.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reads_are_bounded_by_remaining() {
        let mut s = Stream::memory(vec![1, 2, 3, 4, 5]);
        let mut buf = [0u8; 4];
        assert_eq!(s.read(&mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(s.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(s.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_writes_stop_at_capacity() {
        let mut s = Stream::memory_zeroed(4);
        assert_eq!(s.write(b"abcdef").unwrap(), 4);
        assert_eq!(s.write(b"gh").unwrap(), 0);
        assert_eq!(s.into_bytes().unwrap(), b"abcd");
    }

    #[test]
    fn full_memory_sink_fails_write_all() {
        let mut s = Stream::memory_zeroed(2);
        let err = s.write_all(b"abc").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn cursor_is_shared_between_reads_and_writes() {
        let mut s = Stream::memory(vec![0; 6]);
        s.write_all(b"abc").unwrap();
        assert_eq!(s.position(), Some(3));
        let mut rest = [0u8; 3];
        s.read_exact(&mut rest).unwrap();
        assert_eq!(&rest, b"\0\0\0");
        assert_eq!(s.position(), Some(6));
    }

    #[test]
    fn empty_memory_stream_transfers_nothing() {
        let mut s = Stream::memory(Vec::new());
        let mut buf = [0u8; 1];
        assert_eq!(s.read(&mut buf).unwrap(), 0);
        assert_eq!(s.write(b"x").unwrap(), 0);
    }
}
