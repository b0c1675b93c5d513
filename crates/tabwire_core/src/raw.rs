//! Schema-less view of a table stream.
//!
//! Entries are kept as opaque regions (value plus padding), so a table can be
//! inspected or forwarded without knowing its entry types.

use crate::bounded::BoundedReader;
use crate::consts::EncodingByte;
use crate::encoding::Encoding;
use crate::errors::{CodecError, Result};
use crate::io::{Reader, SliceReader, Writer};
use crate::table::{read_region_header, Table, ENTRY_OVERHEAD, TABLE_HEADER_SIZE};
use crate::utils::{read_chunked, read_fixed_u64, write_fixed_u64};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub id: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub fingerprint: u64,
    pub entries: Vec<RawEntry>,
}

impl RawTable {
    pub fn new(fingerprint: u64) -> Self {
        Self { fingerprint, entries: Vec::new() }
    }

    /// Empty raw table carrying `T`'s fingerprint.
    pub fn for_table<T: Table>() -> Self {
        Self::new(T::fingerprint())
    }

    pub fn get(&self, id: u64) -> Option<&RawEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn matches_schema<T: Table>(&self) -> bool {
        self.fingerprint == T::fingerprint()
    }

    pub fn check_schema<T: Table>(&self) -> Result<()> {
        if !self.matches_schema::<T>() {
            return Err(CodecError::InvalidTableHash);
        }
        Ok(())
    }

    /// Decodes the value stored under `id`, if any.
    pub fn decode_entry<V: Encoding + Default>(&self, id: u64) -> Result<Option<V>> {
        let Some(entry) = self.get(id) else {
            return Ok(None);
        };
        let mut reader = SliceReader::new(&entry.data);
        let mut bounded = BoundedReader::new(&mut reader, entry.data.len());
        let mut value = V::default();
        value.read(&mut bounded)?;
        bounded.read_padding()?;
        Ok(Some(value))
    }

    /// Encodes `value` as a new entry under `id`.
    pub fn insert<V: Encoding>(&mut self, id: u64, value: &V) -> Result<()> {
        if self.get(id).is_some() {
            return Err(CodecError::DuplicateTableEntry);
        }
        let mut data = Vec::with_capacity(value.size());
        value.write(&mut data)?;
        self.entries.push(RawEntry { id, data });
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Option<RawEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }
}

impl Encoding for RawTable {
    fn prefix(&self) -> EncodingByte {
        EncodingByte::TABLE
    }

    fn size(&self) -> usize {
        TABLE_HEADER_SIZE
            + self
                .entries
                .iter()
                .map(|e| ENTRY_OVERHEAD + e.data.len())
                .sum::<usize>()
    }

    fn matches(prefix: EncodingByte) -> bool {
        prefix == EncodingByte::TABLE
    }

    fn write_payload<W: Writer + ?Sized>(&self, _prefix: EncodingByte, writer: &mut W) -> Result<()> {
        write_fixed_u64(writer, self.fingerprint)?;
        write_fixed_u64(writer, self.entries.len() as u64)?;
        for e in &self.entries {
            write_fixed_u64(writer, e.id)?;
            writer.write_byte(EncodingByte::BINARY.0)?;
            write_fixed_u64(writer, e.data.len() as u64)?;
            writer.write_bytes(&e.data)?;
        }
        Ok(())
    }

    fn read_payload<R: Reader + ?Sized>(&mut self, _prefix: EncodingByte, reader: &mut R) -> Result<()> {
        self.entries.clear();
        self.fingerprint = read_fixed_u64(reader)?;
        let count = read_fixed_u64(reader)?;
        // each entry needs at least its overhead
        if let Ok(min) = usize::try_from(count) {
            reader.ensure(min.saturating_mul(ENTRY_OVERHEAD))?;
        }
        for _ in 0..count {
            let id = read_fixed_u64(reader)?;
            if self.get(id).is_some() {
                return Err(CodecError::DuplicateTableEntry);
            }
            let size = read_region_header(reader)?;
            let data = read_chunked(reader, size)?;
            self.entries.push(RawEntry { id, data });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::serializer::{from_slice, to_vec};

    crate::table! {
        #[derive(Debug, Default, PartialEq)]
        struct Pair: "Pair" {
            left: Entry<String, 10>,
            right: Entry<u16, 20>,
        }
    }

    #[test]
    fn raw_view_reencodes_exactly() {
        let mut p = Pair::default();
        p.left.set("l".into());
        p.right.set(500);
        let bytes = to_vec(&p).unwrap();

        let raw: RawTable = from_slice(&bytes).unwrap();
        raw.check_schema::<Pair>().unwrap();
        assert_eq!(raw.entries.len(), 2);
        assert_eq!(raw.decode_entry::<u16>(20).unwrap(), Some(500));
        assert_eq!(raw.decode_entry::<u16>(30).unwrap(), None);
        assert_eq!(to_vec(&raw).unwrap(), bytes);
    }

    #[test]
    fn built_raw_table_decodes_as_typed() {
        let mut raw = RawTable::for_table::<Pair>();
        raw.insert(20, &7u16).unwrap();
        raw.insert(99, &"future".to_string()).unwrap();
        assert!(matches!(raw.insert(20, &8u16), Err(CodecError::DuplicateTableEntry)));

        let p: Pair = from_slice(&to_vec(&raw).unwrap()).unwrap();
        assert!(p.left.is_empty());
        assert_eq!(p.right.get(), Some(&7));

        assert!(raw.remove(99).is_some());
        assert!(raw.remove(99).is_none());
    }

    #[test]
    fn raw_view_rejects_duplicates() {
        let mut raw = RawTable::new(1);
        raw.insert(5, &1u8).unwrap();
        raw.entries.push(RawEntry { id: 5, data: vec![2] });
        let bytes = to_vec(&raw).unwrap();
        assert!(matches!(from_slice::<RawTable>(&bytes), Err(CodecError::DuplicateTableEntry)));
    }

    #[test]
    fn other_schema_is_flagged() {
        let raw = RawTable::new(0);
        assert!(!raw.matches_schema::<Pair>());
        assert!(matches!(raw.check_schema::<Pair>(), Err(CodecError::InvalidTableHash)));
    }
}
