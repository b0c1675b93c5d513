//! Fixed-budget windows over a `Writer` / `Reader`.
//!
//! A value encoder may overestimate its size. The writer side pads the
//! shortfall after the value is written; the reader side skips whatever the
//! value decoder left unread. Either side fails once the budget would be
//! exceeded.

use crate::consts::PADDING_BYTE;
use crate::errors::{CodecError, Result};
use crate::io::{Reader, Writer};

pub struct BoundedWriter<'a, W: Writer + ?Sized> {
    writer: &'a mut W,
    capacity: usize,
    index: usize,
}

impl<'a, W: Writer + ?Sized> BoundedWriter<'a, W> {
    pub fn new(writer: &'a mut W, capacity: usize) -> Self {
        Self { writer, capacity, index: 0 }
    }

    /// Bytes written so far.
    pub fn size(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn claim(&mut self, count: usize) -> Result<()> {
        match self.index.checked_add(count) {
            Some(end) if end <= self.capacity => {
                self.index = end;
                Ok(())
            }
            _ => Err(CodecError::WriteLimitReached),
        }
    }

    /// Fills the rest of the window with padding.
    pub fn write_padding(&mut self) -> Result<()> {
        let remaining = self.capacity - self.index;
        self.writer.skip(remaining, PADDING_BYTE)?;
        self.index = self.capacity;
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for BoundedWriter<'_, W> {
    fn prepare(&mut self, size: usize) -> Result<()> {
        if size > self.capacity - self.index {
            return Err(CodecError::WriteLimitReached);
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.claim(1)?;
        self.writer.write_byte(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.claim(bytes.len())?;
        self.writer.write_bytes(bytes)
    }

    fn skip(&mut self, count: usize, padding: u8) -> Result<()> {
        self.claim(count)?;
        self.writer.skip(count, padding)
    }
}

pub struct BoundedReader<'a, R: Reader + ?Sized> {
    reader: &'a mut R,
    capacity: usize,
    index: usize,
}

impl<'a, R: Reader + ?Sized> BoundedReader<'a, R> {
    pub fn new(reader: &'a mut R, capacity: usize) -> Self {
        Self { reader, capacity, index: 0 }
    }

    /// Bytes consumed so far.
    pub fn size(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.index == self.capacity
    }

    fn claim(&mut self, count: usize) -> Result<()> {
        match self.index.checked_add(count) {
            Some(end) if end <= self.capacity => {
                self.index = end;
                Ok(())
            }
            _ => Err(CodecError::ReadLimitReached),
        }
    }

    /// Discards the rest of the window.
    pub fn read_padding(&mut self) -> Result<()> {
        let remaining = self.capacity - self.index;
        self.reader.skip(remaining)?;
        self.index = self.capacity;
        Ok(())
    }
}

impl<R: Reader + ?Sized> Reader for BoundedReader<'_, R> {
    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.capacity - self.index {
            return Err(CodecError::ReadLimitReached);
        }
        self.reader.ensure(size)
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.claim(1)?;
        self.reader.read_byte()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.claim(buf.len())?;
        self.reader.read_bytes(buf)
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        self.claim(count)?;
        self.reader.skip(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceReader;

    #[test]
    fn writer_pads_shortfall() {
        let mut out = Vec::new();
        let mut w = BoundedWriter::new(&mut out, 5);
        w.write_bytes(&[1, 2]).unwrap();
        assert_eq!(w.size(), 2);
        w.write_padding().unwrap();
        assert_eq!(out, [1, 2, 0, 0, 0]);
    }

    #[test]
    fn writer_rejects_overrun() {
        let mut out = Vec::new();
        let mut w = BoundedWriter::new(&mut out, 2);
        w.write_byte(1).unwrap();
        assert!(matches!(w.write_bytes(&[2, 3]), Err(CodecError::WriteLimitReached)));
        assert!(matches!(w.prepare(2), Err(CodecError::WriteLimitReached)));
        w.write_byte(2).unwrap();
        assert!(matches!(w.write_byte(3), Err(CodecError::WriteLimitReached)));
        assert_eq!(out, [1, 2]);
    }

    #[test]
    fn reader_skips_unread_tail() {
        let data = [7u8, 0, 0, 9];
        let mut r = SliceReader::new(&data);
        {
            let mut b = BoundedReader::new(&mut r, 3);
            assert_eq!(b.read_byte().unwrap(), 7);
            b.read_padding().unwrap();
            assert!(b.is_empty());
        }
        assert_eq!(r.read_byte().unwrap(), 9);
    }

    #[test]
    fn reader_rejects_overrun() {
        let data = [1u8, 2, 3, 4];
        let mut r = SliceReader::new(&data);
        let mut b = BoundedReader::new(&mut r, 2);
        let mut buf = [0u8; 3];
        assert!(matches!(b.read_bytes(&mut buf), Err(CodecError::ReadLimitReached)));
        assert!(matches!(b.ensure(3), Err(CodecError::ReadLimitReached)));
        assert!(matches!(b.skip(3), Err(CodecError::ReadLimitReached)));
    }

    #[test]
    fn windows_nest() {
        let mut out = Vec::new();
        {
            let mut outer = BoundedWriter::new(&mut out, 6);
            {
                let mut inner = BoundedWriter::new(&mut outer, 3);
                inner.write_byte(1).unwrap();
                inner.write_padding().unwrap();
            }
            outer.write_byte(2).unwrap();
            outer.write_padding().unwrap();
        }
        assert_eq!(out, [1, 0, 0, 2, 0, 0]);
    }
}
