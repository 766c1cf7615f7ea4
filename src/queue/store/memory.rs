//! Volatile in-memory store.

use super::OrderedStore;
use crate::queue::error::StoreError;
use std::collections::BTreeMap;

/// An [`OrderedStore`] held entirely in memory.
///
/// `Vec<u8>` keys in a `BTreeMap` order lexicographically, matching the
/// on-disk stores. Nothing survives the value being dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    closed: bool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            closed: false,
        }
    }
}

impl OrderedStore for MemoryStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_open()?;
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.entries.remove(key);
        Ok(())
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_open()?;
        Ok(self.entries.keys().next().cloned())
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_open()?;
        Ok(self.entries.keys().next_back().cloned())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        Ok(())
    }
}
