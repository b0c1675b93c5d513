//! Sequential byte sinks and sources the codec writes to and reads from.
//!
//! `Vec<u8>` and `SliceReader` cover in-memory buffers; `StreamWriter` and
//! `StreamReader` adapt any `std::io::Write` / `std::io::Read`.

use crate::errors::{CodecError, Result};
use std::io::{self, Read, Write};

pub trait Writer {
    /// Capacity hint issued before a top-level value is written.
    fn prepare(&mut self, _size: usize) -> Result<()> {
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()>;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Emits `count` copies of `padding`.
    fn skip(&mut self, count: usize, padding: u8) -> Result<()>;
}

pub trait Reader {
    /// Fails with `ReadLimitReached` when fewer than `size` bytes can remain.
    /// Sources that cannot tell accept any size.
    fn ensure(&mut self, _size: usize) -> Result<()> {
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8>;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discards `count` bytes without buffering them.
    fn skip(&mut self, count: usize) -> Result<()>;
}

impl Writer for Vec<u8> {
    fn prepare(&mut self, size: usize) -> Result<()> {
        self.reserve(size);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn skip(&mut self, count: usize, padding: u8) -> Result<()> {
        self.resize(self.len() + count, padding);
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn prepare(&mut self, size: usize) -> Result<()> {
        (**self).prepare(size)
    }
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
    fn skip(&mut self, count: usize, padding: u8) -> Result<()> {
        (**self).skip(count, padding)
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    fn ensure(&mut self, size: usize) -> Result<()> {
        (**self).ensure(size)
    }
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_bytes(buf)
    }
    fn skip(&mut self, count: usize) -> Result<()> {
        (**self).skip(count)
    }
}

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the slice.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl Reader for SliceReader<'_> {
    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.remaining() {
            return Err(CodecError::ReadLimitReached);
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or(CodecError::ReadLimitReached)?;
        self.pos += 1;
        Ok(b)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure(buf.len())?;
        buf.copy_from_slice(&self.data[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }
}

/// Adapts an `io::Write`; failures pass through as `CodecError::Io`.
#[derive(Debug)]
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer for StreamWriter<W> {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn skip(&mut self, count: usize, padding: u8) -> Result<()> {
        let copied = io::copy(&mut io::repeat(padding).take(count as u64), &mut self.inner)?;
        if copied != count as u64 {
            return Err(CodecError::StreamError);
        }
        Ok(())
    }
}

/// Adapts an `io::Read`; failures pass through as `CodecError::Io`.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Reader for StreamReader<R> {
    fn read_byte(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count as u64), &mut io::sink())?;
        if skipped != count as u64 {
            return Err(CodecError::Io(io::ErrorKind::UnexpectedEof.into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn slice_reader_reports_short_input() {
        let data = [1u8, 2, 3];
        let mut r = SliceReader::new(&data);
        let mut buf = [0u8; 2];
        r.read_bytes(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        assert!(matches!(r.read_bytes(&mut buf), Err(CodecError::ReadLimitReached)));
        assert!(matches!(r.skip(2), Err(CodecError::ReadLimitReached)));
        assert_eq!(r.read_byte().unwrap(), 3);
        assert!(r.is_empty());
    }

    #[test]
    fn stream_reader_skips_without_buffering() {
        let mut r = StreamReader::new(Cursor::new(vec![9u8; 10]));
        r.skip(7).unwrap();
        let mut rest = [0u8; 3];
        r.read_bytes(&mut rest).unwrap();
        assert!(matches!(r.skip(1), Err(CodecError::Io(_))));
    }

    #[test]
    fn stream_writer_pads() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_byte(0xaa).unwrap();
        w.skip(3, 0).unwrap();
        assert_eq!(w.into_inner(), vec![0xaa, 0, 0, 0]);
    }
}
