use crate::consts::FIXED_U64_SIZE;
use crate::errors::{CodecError, Result};
use crate::io::{Reader, Writer};
use byteorder::{ByteOrder, LittleEndian as LE};

pub fn write_fixed_u64<W: Writer + ?Sized>(w: &mut W, v: u64) -> Result<()> {
    let mut buf = [0u8; FIXED_U64_SIZE];
    LE::write_u64(&mut buf, v);
    w.write_bytes(&buf)
}

pub fn read_fixed_u64<R: Reader + ?Sized>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; FIXED_U64_SIZE];
    r.read_bytes(&mut buf)?;
    Ok(LE::read_u64(&buf))
}

/// Byte runs are copied in chunks of this size, so a lying length on an
/// unbounded stream cannot force one large allocation.
pub const READ_CHUNK: usize = 64 * 1024;

/// Reads exactly `size` bytes, growing the buffer only as data arrives.
pub fn read_chunked<R: Reader + ?Sized>(reader: &mut R, size: usize) -> Result<Vec<u8>> {
    reader.ensure(size)?;
    let mut data = Vec::with_capacity(size.min(READ_CHUNK));
    let mut remaining = size;
    while remaining > 0 {
        let n = remaining.min(READ_CHUNK);
        let start = data.len();
        data.resize(start + n, 0);
        reader.read_bytes(&mut data[start..])?;
        remaining -= n;
    }
    Ok(data)
}

/// Converts a wire length to `usize`, rejecting values the platform cannot address.
pub fn wire_len(n: u64) -> Result<usize> {
    usize::try_from(n).map_err(|_| CodecError::InvalidContainerLength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceReader, StreamReader};
    use std::io::Cursor;

    #[test]
    fn fixed_u64_is_little_endian() {
        let mut out = Vec::new();
        write_fixed_u64(&mut out, 0x0102_0304_0506_0708).unwrap();
        assert_eq!(out, [8, 7, 6, 5, 4, 3, 2, 1]);
        let mut r = SliceReader::new(&out);
        assert_eq!(read_fixed_u64(&mut r).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn chunked_read_spans_chunks() {
        let data: Vec<u8> = (0..READ_CHUNK + 10).map(|i| i as u8).collect();
        let mut r = StreamReader::new(Cursor::new(data.clone()));
        assert_eq!(read_chunked(&mut r, data.len()).unwrap(), data);
    }

    #[test]
    fn chunked_read_stops_at_end_of_stream() {
        let mut r = StreamReader::new(Cursor::new(vec![1u8; 3]));
        assert!(matches!(read_chunked(&mut r, 1 << 44), Err(CodecError::Io(_))));
    }
}
