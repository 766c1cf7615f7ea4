//! Ordered key-value store adapter.
//!
//! The queue consumes its backing store exclusively through the
//! [`OrderedStore`] trait: point writes, point reads, deletes and the first
//! and last key in byte order. Keys are compared as raw bytes, which is what
//! lets the big-endian key encoding double as the queue order.
//!
//! # Implementations
//!
//! - [`RedbStore`]: persistent store backed by an embedded `redb` database
//!   (the default for [`Queue::open`](crate::Queue::open))
//! - [`MemoryStore`]: volatile `BTreeMap` store

pub mod memory;
pub mod redb_store;

pub use self::memory::MemoryStore;
pub use self::redb_store::RedbStore;

use super::error::StoreError;

/// A durable map from byte keys to byte values, iterable in key order.
///
/// Implementations must order keys by lexicographic byte comparison and
/// must have committed a write by the time [`put`](OrderedStore::put)
/// returns `Ok(())`: recovery trusts the keys it finds after a restart.
///
/// # Thread Safety
///
/// The trait requires `Send + Sync` so a queue can be shared between
/// threads. The queue only calls into its store while holding its own
/// lock, so implementations do not need interior synchronization.
pub trait OrderedStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write could not be committed.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent; `Err` is reserved for
    /// failures of the store itself.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store could not be read.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the removal could not be committed.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// The smallest key in the store, or `None` if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store could not be read.
    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// The largest key in the store, or `None` if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store could not be read.
    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Release the store. Every other method fails with
    /// [`StoreError::Closed`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store could not be shut down cleanly;
    /// the store is still open in that case.
    fn close(&mut self) -> Result<(), StoreError>;
}
