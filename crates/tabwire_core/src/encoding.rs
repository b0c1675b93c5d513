//! Generic value codec: every value is a prefix byte followed by a payload.
//!
//! Integers pick the smallest encoding that holds the value and decode from
//! any encoding no wider than the destination. Strings, blobs and arrays carry
//! a length written as an unsigned integer value.

use crate::consts::{EncodingByte, PREFIX_SIZE};
use crate::errors::{CodecError, Result};
use crate::io::{Reader, Writer};
use crate::utils::{read_chunked, wire_len};
use byteorder::{ByteOrder, LittleEndian as LE};
use std::mem::size_of;

pub trait Encoding {
    fn prefix(&self) -> EncodingByte;

    /// Bytes `write` will emit, prefix included. May overestimate, never underestimate.
    fn size(&self) -> usize;

    fn matches(prefix: EncodingByte) -> bool;

    fn write_payload<W: Writer + ?Sized>(&self, prefix: EncodingByte, writer: &mut W) -> Result<()>;

    fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, reader: &mut R) -> Result<()>;

    fn write<W: Writer + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let prefix = self.prefix();
        writer.write_byte(prefix.0)?;
        self.write_payload(prefix, writer)
    }

    fn read<R: Reader + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let prefix = EncodingByte(reader.read_byte()?);
        if !Self::matches(prefix) {
            return Err(CodecError::UnexpectedEncodingType);
        }
        self.read_payload(prefix, reader)
    }
}

// integers ------------------------------------------------------------------

fn unsigned_prefix(v: u64) -> EncodingByte {
    if v <= EncodingByte::POSITIVE_FIXINT_MAX.0 as u64 {
        EncodingByte(v as u8)
    } else if v <= u8::MAX as u64 {
        EncodingByte::U8
    } else if v <= u16::MAX as u64 {
        EncodingByte::U16
    } else if v <= u32::MAX as u64 {
        EncodingByte::U32
    } else {
        EncodingByte::U64
    }
}

fn signed_prefix(v: i64) -> EncodingByte {
    if (0..=EncodingByte::POSITIVE_FIXINT_MAX.0 as i64).contains(&v) {
        EncodingByte(v as u8)
    } else if (-64..0).contains(&v) {
        EncodingByte(v as i8 as u8)
    } else if i8::try_from(v).is_ok() {
        EncodingByte::I8
    } else if i16::try_from(v).is_ok() {
        EncodingByte::I16
    } else if i32::try_from(v).is_ok() {
        EncodingByte::I32
    } else {
        EncodingByte::I64
    }
}

/// Payload width of an integer prefix; fixints carry no payload.
fn payload_width(prefix: EncodingByte) -> usize {
    match prefix {
        EncodingByte::U8 | EncodingByte::I8 => 1,
        EncodingByte::U16 | EncodingByte::I16 => 2,
        EncodingByte::U32 | EncodingByte::I32 => 4,
        EncodingByte::U64 | EncodingByte::I64 => 8,
        _ => 0,
    }
}

fn unsigned_matches(prefix: EncodingByte, width: usize) -> bool {
    prefix.is_positive_fixint()
        || matches!(
            prefix,
            EncodingByte::U8 | EncodingByte::U16 | EncodingByte::U32 | EncodingByte::U64
        ) && payload_width(prefix) <= width
}

fn signed_matches(prefix: EncodingByte, width: usize) -> bool {
    prefix.is_positive_fixint()
        || prefix.is_negative_fixint()
        || matches!(
            prefix,
            EncodingByte::I8 | EncodingByte::I16 | EncodingByte::I32 | EncodingByte::I64
        ) && payload_width(prefix) <= width
}

fn write_int_payload<W: Writer + ?Sized>(prefix: EncodingByte, bits: u64, writer: &mut W) -> Result<()> {
    let width = payload_width(prefix);
    if width == 0 {
        return Ok(());
    }
    let mut buf = [0u8; 8];
    LE::write_u64(&mut buf, bits);
    writer.write_bytes(&buf[..width])
}

fn read_unsigned_payload<R: Reader + ?Sized>(prefix: EncodingByte, reader: &mut R) -> Result<u64> {
    if prefix.is_positive_fixint() {
        return Ok(prefix.0 as u64);
    }
    let width = payload_width(prefix);
    let mut buf = [0u8; 8];
    reader.read_bytes(&mut buf[..width])?;
    Ok(LE::read_uint(&buf, width))
}

fn read_signed_payload<R: Reader + ?Sized>(prefix: EncodingByte, reader: &mut R) -> Result<i64> {
    if prefix.is_positive_fixint() {
        return Ok(prefix.0 as i64);
    }
    if prefix.is_negative_fixint() {
        return Ok(prefix.0 as i8 as i64);
    }
    let width = payload_width(prefix);
    let mut buf = [0u8; 8];
    reader.read_bytes(&mut buf[..width])?;
    Ok(LE::read_int(&buf, width))
}

macro_rules! unsigned_encoding {
    ($($t:ty),*) => {$(
        impl Encoding for $t {
            fn prefix(&self) -> EncodingByte {
                unsigned_prefix(*self as u64)
            }

            fn size(&self) -> usize {
                PREFIX_SIZE + payload_width(self.prefix())
            }

            fn matches(prefix: EncodingByte) -> bool {
                unsigned_matches(prefix, size_of::<$t>())
            }

            fn write_payload<W: Writer + ?Sized>(&self, prefix: EncodingByte, writer: &mut W) -> Result<()> {
                write_int_payload(prefix, *self as u64, writer)
            }

            fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, reader: &mut R) -> Result<()> {
                let v = read_unsigned_payload(prefix, reader)?;
                *self = <$t>::try_from(v).map_err(|_| CodecError::UnexpectedEncodingType)?;
                Ok(())
            }
        }
    )*};
}

macro_rules! signed_encoding {
    ($($t:ty),*) => {$(
        impl Encoding for $t {
            fn prefix(&self) -> EncodingByte {
                signed_prefix(*self as i64)
            }

            fn size(&self) -> usize {
                PREFIX_SIZE + payload_width(self.prefix())
            }

            fn matches(prefix: EncodingByte) -> bool {
                signed_matches(prefix, size_of::<$t>())
            }

            fn write_payload<W: Writer + ?Sized>(&self, prefix: EncodingByte, writer: &mut W) -> Result<()> {
                write_int_payload(prefix, *self as i64 as u64, writer)
            }

            fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, reader: &mut R) -> Result<()> {
                let v = read_signed_payload(prefix, reader)?;
                *self = <$t>::try_from(v).map_err(|_| CodecError::UnexpectedEncodingType)?;
                Ok(())
            }
        }
    )*};
}

unsigned_encoding!(u8, u16, u32, u64);
signed_encoding!(i8, i16, i32, i64);

// bool / floats --------------------------------------------------------------

impl Encoding for bool {
    fn prefix(&self) -> EncodingByte {
        if *self { EncodingByte::TRUE } else { EncodingByte::FALSE }
    }

    fn size(&self) -> usize {
        PREFIX_SIZE
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::TRUE || prefix == EncodingByte::FALSE
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, _writer: &mut W) -> Result<()> {
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, _reader: &mut R) -> Result<()> {
        *self = prefix == EncodingByte::TRUE;
        Ok(())
    }
}

impl Encoding for f32 {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::F32
    }

    fn size(&self) -> usize {
        PREFIX_SIZE + size_of::<f32>()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::F32
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        writer.write_bytes(&self.to_le_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, _prefix: EncodingByte, reader: &mut R) -> Result<()> {
        let mut buf = [0u8; 4];
        reader.read_bytes(&mut buf)?;
        *self = f32::from_le_bytes(buf);
        Ok(())
    }
}

impl Encoding for f64 {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::F64
    }

    fn size(&self) -> usize {
        PREFIX_SIZE + size_of::<f64>()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::F64 || prefix == EncodingByte::F32
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        writer.write_bytes(&self.to_le_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, reader: &mut R) -> Result<()> {
        if prefix == EncodingByte::F32 {
            let mut narrow = 0f32;
            narrow.read_payload(prefix, reader)?;
            *self = narrow as f64;
            return Ok(());
        }
        let mut buf = [0u8; 8];
        reader.read_bytes(&mut buf)?;
        *self = f64::from_le_bytes(buf);
        Ok(())
    }
}

// length-prefixed values ------------------------------------------------------

fn length_size(len: usize) -> usize {
    (len as u64).size()
}

fn read_length<R: Reader + ?Sized>(reader: &mut R) -> Result<usize> {
    let mut len = 0u64;
    len.read(reader)?;
    wire_len(len)
}

fn read_byte_run<R: Reader + ?Sized>(reader: &mut R) -> Result<Vec<u8>> {
    let len = read_length(reader)?;
    read_chunked(reader, len)
}

impl Encoding for String {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::STRING
    }

    fn size(&self) -> usize {
        PREFIX_SIZE + length_size(self.len()) + self.len()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::STRING
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        (self.len() as u64).write(writer)?;
        writer.write_bytes(self.as_bytes())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, _prefix: EncodingByte, reader: &mut R) -> Result<()> {
        let bytes = read_byte_run(reader)?;
        *self = String::from_utf8(bytes).map_err(|_| CodecError::ProtocolError)?;
        Ok(())
    }
}

/// Opaque bytes, encoded as a binary region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Blob {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl Encoding for Blob {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::BINARY
    }

    fn size(&self) -> usize {
        PREFIX_SIZE + length_size(self.0.len()) + self.0.len()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::BINARY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        (self.0.len() as u64).write(writer)?;
        writer.write_bytes(&self.0)
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, _prefix: EncodingByte, reader: &mut R) -> Result<()> {
        self.0 = read_byte_run(reader)?;
        Ok(())
    }
}

impl<T: Encoding + Default> Encoding for Vec<T> {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::ARRAY
    }

    fn size(&self) -> usize {
        PREFIX_SIZE + length_size(self.len()) + self.iter().map(Encoding::size).sum::<usize>()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::ARRAY
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        (self.len() as u64).write(writer)?;
        for item in self {
            item.write(writer)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, _prefix: EncodingByte, reader: &mut R) -> Result<()> {
        let len = read_length(reader)?;
        // every element takes at least its prefix byte
        reader.ensure(len)?;
        self.clear();
        self.reserve(len.min(1024));
        for _ in 0..len {
            let mut item = T::default();
            item.read(reader)?;
            self.push(item);
        }
        Ok(())
    }
}

impl<T: Encoding + Default> Encoding for Option<T> {
    fn prefix(&self) -> EncodingByte {
        match self {
            Some(v) => v.prefix(),
            None => EncodingByte::NIL,
        }
    }

    fn size(&self) -> usize {
        match self {
            Some(v) => v.size(),
            None => PREFIX_SIZE,
        }
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::NIL || T::matches(prefix)
    }

    fn write_payload<W: Writer + ?Sized>(&self, prefix: EncodingByte, writer: &mut W) -> Result<()> {
        match self {
            Some(v) => v.write_payload(prefix, writer),
            None => Ok(()),
        }
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, prefix: EncodingByte, reader: &mut R) -> Result<()> {
        if prefix == EncodingByte::NIL {
            *self = None;
            return Ok(());
        }
        let mut v = T::default();
        v.read_payload(prefix, reader)?;
        *self = Some(v);
        Ok(())
    }
}
