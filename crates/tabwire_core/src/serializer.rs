use crate::encoding::Encoding;
use crate::errors::Result;
use crate::io::{Reader, SliceReader, Writer};

/// Writes top-level values to a `Writer`.
#[derive(Debug, Default)]
pub struct Serializer<W> {
    writer: W,
}

impl<W: Writer> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_size<T: Encoding>(&self, value: &T) -> usize {
        value.size()
    }

    pub fn write<T: Encoding>(&mut self, value: &T) -> Result<()> {
        self.writer.prepare(value.size())?;
        value.write(&mut self.writer)
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads top-level values from a `Reader`.
#[derive(Debug, Default)]
pub struct Deserializer<R> {
    reader: R,
}

impl<R: Reader> Deserializer<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn read<T: Encoding>(&mut self, value: &mut T) -> Result<()> {
        value.read(&mut self.reader)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

pub fn to_vec<T: Encoding>(value: &T) -> Result<Vec<u8>> {
    let mut s = Serializer::new(Vec::new());
    s.write(value)?;
    Ok(s.into_inner())
}

/// Decodes one value from the front of `bytes`; trailing bytes are ignored.
pub fn from_slice<T: Encoding + Default>(bytes: &[u8]) -> Result<T> {
    let mut d = Deserializer::new(SliceReader::new(bytes));
    let mut value = T::default();
    d.read(&mut value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{StreamReader, StreamWriter};
    use std::io::Cursor;

    #[test]
    fn values_follow_each_other() {
        let mut s = Serializer::new(Vec::new());
        s.write(&1u8).unwrap();
        s.write(&"two".to_string()).unwrap();
        assert_eq!(s.get_size(&3u64), 1);
        let bytes = s.into_inner();

        let mut d = Deserializer::new(SliceReader::new(&bytes));
        let mut a = 0u8;
        let mut b = String::new();
        d.read(&mut a).unwrap();
        d.read(&mut b).unwrap();
        assert_eq!((a, b.as_str()), (1, "two"));
        assert!(d.reader().is_empty());
    }

    #[test]
    fn streams_work_too() {
        let mut s = Serializer::new(StreamWriter::new(Vec::new()));
        s.write(&vec![1i64, -2, 3]).unwrap();
        let bytes = s.into_inner().into_inner();

        let mut d = Deserializer::new(StreamReader::new(Cursor::new(bytes)));
        let mut v: Vec<i64> = Vec::new();
        d.read(&mut v).unwrap();
        assert_eq!(v, [1, -2, 3]);
    }
}
