//! Version-tolerant binary tables.
//!
//! A table is a record of id-tagged optional entries. Writers emit only the
//! entries that are present; readers skip ids they do not know and leave
//! missing entries empty, so schemas can gain and retire entries without
//! breaking peers built against another revision.

pub mod bounded;
pub mod consts;
pub mod encoding;
pub mod entry;
pub mod errors;
pub mod hash;
pub mod io;
pub mod raw;
pub mod serializer;
pub mod table;
pub mod utils;

pub use bounded::{BoundedReader, BoundedWriter};
pub use consts::EncodingByte;
pub use encoding::{Blob, Encoding};
pub use entry::{DeletedEntry, Disposition, Entry};
pub use errors::{CodecError, Result};
pub use io::{Reader, SliceReader, StreamReader, StreamWriter, Writer};
pub use raw::{RawEntry, RawTable};
pub use serializer::{from_slice, to_vec, Deserializer, Serializer};
pub use table::{Table, TableEntry};
