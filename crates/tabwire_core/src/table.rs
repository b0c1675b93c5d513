//! Tables: records whose fields are independently optional, id-tagged entries.
//!
//! Wire layout (header integers are fixed 64-bit little endian):
//!
//! ```text
//! table:  [TAB][fingerprint][count][count x entry]
//! entry:  [id][BIN][size][value][padding]
//! ```
//!
//! `count` is the number of present active entries. `size` covers the value
//! and its padding, so a reader can skip an entry it does not know without
//! understanding its type. Deleted and empty entries are never written.
//!
//! Rules for keeping versions of a table compatible:
//! 1. Give every new entry a fresh id; never reuse an id in the same table.
//! 2. Retire an entry by turning it into a `DeletedEntry` with the same id.
//! 3. Never change an entry's id.
//! 4. Never change the schema name; its fingerprint is checked on decode.

use crate::bounded::{BoundedReader, BoundedWriter};
use crate::consts::{EncodingByte, FIXED_U64_SIZE, PREFIX_SIZE};
use crate::encoding::Encoding;
use crate::entry::{DeletedEntry, Disposition, Entry};
use crate::errors::{CodecError, Result};
use crate::io::{Reader, Writer};
use crate::utils::{read_fixed_u64, wire_len, write_fixed_u64};

/// Bytes an entry adds around its value: id, region marker and size.
pub const ENTRY_OVERHEAD: usize = FIXED_U64_SIZE + PREFIX_SIZE + FIXED_U64_SIZE;

/// Bytes of the table header: marker, fingerprint and count.
pub const TABLE_HEADER_SIZE: usize = PREFIX_SIZE + FIXED_U64_SIZE + FIXED_U64_SIZE;

/// Schema descriptor of a table type. Implemented by [`table!`](crate::table).
pub trait Table: Default {
    /// Declared schema name.
    const NAME: &'static str;

    /// Entry ids in declaration order.
    const ENTRY_IDS: &'static [u64];

    /// Fingerprint of `NAME`, computed once per type.
    fn fingerprint() -> u64;

    fn active_entry_count(&self) -> u64;

    /// Sum of the encoded sizes of all present entries.
    fn entries_size(&self) -> usize;

    fn clear_entries(&mut self);

    fn write_entries<W: Writer + ?Sized>(&self, writer: &mut W) -> Result<()>;

    /// Reads the entry body for `id` into the matching slot, or skips it.
    fn read_entry_for_id<R: Reader + ?Sized>(&mut self, id: u64, reader: &mut R) -> Result<()>;
}

/// One slot of a table, as seen by the table codec.
pub trait TableEntry {
    const ID: u64;
    const DISPOSITION: Disposition;

    fn is_present(&self) -> bool;

    fn clear(&mut self);

    /// Encoded size of the whole entry; zero when nothing is written.
    fn entry_size(&self) -> usize;

    fn write_entry<W: Writer + ?Sized>(&self, writer: &mut W) -> Result<()>;

    /// Reads everything after the id.
    fn read_entry<R: Reader + ?Sized>(&mut self, reader: &mut R) -> Result<()>;
}

impl<T: Encoding + Default, const ID: u64> TableEntry for Entry<T, ID> {
    const ID: u64 = ID;
    const DISPOSITION: Disposition = Disposition::Active;

    fn is_present(&self) -> bool {
        self.get().is_some()
    }

    fn clear(&mut self) {
        self.take();
    }

    fn entry_size(&self) -> usize {
        match self.get() {
            Some(value) => ENTRY_OVERHEAD + value.size(),
            None => 0,
        }
    }

    fn write_entry<W: Writer + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let Some(value) = self.get() else {
            return Ok(());
        };
        write_fixed_u64(writer, ID)?;
        writer.write_byte(EncodingByte::BINARY.0)?;

        // value encoders may overestimate; the window pads to the announced size
        let size = value.size();
        write_fixed_u64(writer, size as u64)?;
        let mut bounded = BoundedWriter::new(writer, size);
        value.write(&mut bounded)?;
        bounded.write_padding()
    }

    fn read_entry<R: Reader + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        // Slots are cleared before a table is read, so a filled slot means the
        // same id arrived twice.
        if self.get().is_some() {
            return Err(CodecError::DuplicateTableEntry);
        }
        let size = read_region_header(reader)?;
        let value = self.insert(T::default());
        let mut bounded = BoundedReader::new(reader, size);
        value.read(&mut bounded)?;
        bounded.read_padding()
    }
}

impl<T, const ID: u64> TableEntry for DeletedEntry<T, ID> {
    const ID: u64 = ID;
    const DISPOSITION: Disposition = Disposition::Deleted;

    fn is_present(&self) -> bool {
        false
    }

    fn clear(&mut self) {}

    fn entry_size(&self) -> usize {
        0
    }

    fn write_entry<W: Writer + ?Sized>(&self, _writer: &mut W) -> Result<()> {
        Ok(())
    }

    fn read_entry<R: Reader + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        skip_entry(reader)
    }
}

/// Reads `[BIN][size]` and returns the region size.
pub fn read_region_header<R: Reader + ?Sized>(reader: &mut R) -> Result<usize> {
    let prefix = EncodingByte(reader.read_byte()?);
    if prefix != EncodingByte::BINARY {
        return Err(CodecError::UnexpectedEncodingType);
    }
    wire_len(read_fixed_u64(reader)?)
}

/// Skips an entry body without interpreting it.
pub fn skip_entry<R: Reader + ?Sized>(reader: &mut R) -> Result<()> {
    let size = read_region_header(reader)?;
    reader.skip(size)
}

pub fn table_size<T: Table>(value: &T) -> usize {
    TABLE_HEADER_SIZE + value.entries_size()
}

/// Writes fingerprint, count and entries; the marker is written by the caller.
pub fn write_table_payload<T: Table, W: Writer + ?Sized>(value: &T, writer: &mut W) -> Result<()> {
    write_fixed_u64(writer, T::fingerprint())?;
    write_fixed_u64(writer, value.active_entry_count())?;
    value.write_entries(writer)
}

/// Reads fingerprint, count and entries into `value`; the marker is already consumed.
pub fn read_table_payload<T: Table, R: Reader + ?Sized>(value: &mut T, reader: &mut R) -> Result<()> {
    value.clear_entries();

    let fingerprint = read_fixed_u64(reader)?;
    if fingerprint != T::fingerprint() {
        return Err(CodecError::InvalidTableHash);
    }

    let count = read_fixed_u64(reader)?;
    for _ in 0..count {
        let id = read_fixed_u64(reader)?;
        value.read_entry_for_id(id, reader)?;
    }
    Ok(())
}

/// True when no id appears twice. Evaluated at compile time by [`table!`](crate::table).
pub const fn entry_ids_unique(ids: &[u64]) -> bool {
    let mut i = 0;
    while i < ids.len() {
        let mut j = i + 1;
        while j < ids.len() {
            if ids[i] == ids[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Declares a table struct and its schema.
///
/// ```
/// use tabwire_core::{from_slice, table, to_vec, DeletedEntry, Entry};
///
/// table! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Contact: "Contact" {
///         pub name: Entry<String, 0>,
///         pub phone: Entry<u64, 1>,
///         fax: DeletedEntry<u64, 2>,
///     }
/// }
///
/// let mut c = Contact::default();
/// c.name.set("Ada".to_string());
/// let bytes = to_vec(&c).unwrap();
/// let back: Contact = from_slice(&bytes).unwrap();
/// assert_eq!(back.name.get().map(String::as_str), Some("Ada"));
/// assert!(back.phone.is_empty());
/// ```
///
/// Ids must be unique, retired ones included:
///
/// ```compile_fail
/// use tabwire_core::{table, DeletedEntry, Entry};
///
/// table! {
///     #[derive(Default)]
///     struct Reused: "Reused" {
///         old: DeletedEntry<u32, 1>,
///         new: Entry<String, 1>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! table {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $schema:literal {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $entry:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $entry,
            )*
        }

        impl $crate::Table for $name {
            const NAME: &'static str = $schema;
            const ENTRY_IDS: &'static [u64] = &[$(<$entry as $crate::TableEntry>::ID),*];

            fn fingerprint() -> u64 {
                static FINGERPRINT: ::std::sync::OnceLock<u64> = ::std::sync::OnceLock::new();
                *FINGERPRINT.get_or_init(|| $crate::hash::schema_fingerprint($schema))
            }

            fn active_entry_count(&self) -> u64 {
                0 $(+ <$entry as $crate::TableEntry>::is_present(&self.$field) as u64)*
            }

            fn entries_size(&self) -> usize {
                0 $(+ <$entry as $crate::TableEntry>::entry_size(&self.$field))*
            }

            fn clear_entries(&mut self) {
                $(<$entry as $crate::TableEntry>::clear(&mut self.$field);)*
            }

            fn write_entries<W: $crate::io::Writer + ?Sized>(
                &self,
                writer: &mut W,
            ) -> $crate::Result<()> {
                $(<$entry as $crate::TableEntry>::write_entry(&self.$field, writer)?;)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn read_entry_for_id<R: $crate::io::Reader + ?Sized>(
                &mut self,
                id: u64,
                reader: &mut R,
            ) -> $crate::Result<()> {
                $(
                    if id == <$entry as $crate::TableEntry>::ID {
                        return <$entry as $crate::TableEntry>::read_entry(&mut self.$field, reader);
                    }
                )*
                $crate::table::skip_entry(reader)
            }
        }

        const _: () = assert!(
            $crate::table::entry_ids_unique(<$name as $crate::Table>::ENTRY_IDS),
            "table entry ids must be unique"
        );

        impl $crate::Encoding for $name {
            fn prefix(&self) -> $crate::consts::EncodingByte {
                $crate::consts::EncodingByte::TABLE
            }

            fn size(&self) -> usize {
                $crate::table::table_size(self)
            }

            fn matches(prefix: $crate::consts::EncodingByte) -> bool {
                prefix == $crate::consts::EncodingByte::TABLE
            }

            fn write_payload<W: $crate::io::Writer + ?Sized>(
                &self,
                _prefix: $crate::consts::EncodingByte,
                writer: &mut W,
            ) -> $crate::Result<()> {
                $crate::table::write_table_payload(self, writer)
            }

            fn read_payload<R: $crate::io::Reader + ?Sized>(
                &mut self,
                _prefix: $crate::consts::EncodingByte,
                reader: &mut R,
            ) -> $crate::Result<()> {
                $crate::table::read_table_payload(self, reader)
            }
        }
    };
}
