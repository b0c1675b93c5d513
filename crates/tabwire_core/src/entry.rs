//! Table field slots.
//!
//! `Entry<T, ID>` is an optional value tagged with a permanent id.
//! `DeletedEntry<T, ID>` keeps a retired id reserved and never holds a value.

use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Active,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<T, const ID: u64> {
    value: Option<T>,
}

impl<T, const ID: u64> Entry<T, ID> {
    pub const ID: u64 = ID;

    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Stores `value` and returns a reference to it.
    pub fn insert(&mut self, value: T) -> &mut T {
        self.value.insert(value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T, const ID: u64> Default for Entry<T, ID> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, const ID: u64> From<T> for Entry<T, ID> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T, const ID: u64> From<Option<T>> for Entry<T, ID> {
    fn from(value: Option<T>) -> Self {
        Self { value }
    }
}

pub struct DeletedEntry<T, const ID: u64> {
    _retired: PhantomData<fn() -> T>,
}

impl<T, const ID: u64> DeletedEntry<T, ID> {
    pub const ID: u64 = ID;

    pub fn new() -> Self {
        Self { _retired: PhantomData }
    }

    pub fn is_empty(&self) -> bool {
        true
    }
}

impl<T, const ID: u64> Default for DeletedEntry<T, ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const ID: u64> Clone for DeletedEntry<T, ID> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const ID: u64> Copy for DeletedEntry<T, ID> {}

impl<T, const ID: u64> PartialEq for DeletedEntry<T, ID> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T, const ID: u64> Eq for DeletedEntry<T, ID> {}

impl<T, const ID: u64> fmt::Debug for DeletedEntry<T, ID> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeletedEntry<{ID}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_holds_optional_value() {
        let mut e: Entry<u32, 4> = Entry::default();
        assert!(e.is_empty());
        *e.insert(3) += 1;
        assert_eq!(e.get(), Some(&4));
        assert_eq!(e.take(), Some(4));
        assert!(!e.is_present());
        assert_eq!(Entry::<u32, 4>::ID, 4);
    }

    #[test]
    fn deleted_entry_is_always_empty() {
        let d: DeletedEntry<String, 9> = DeletedEntry::default();
        assert!(d.is_empty());
        assert_eq!(d, d.clone());
        assert_eq!(format!("{d:?}"), "DeletedEntry<9>");
    }
}
