//! Persistent store backed by an embedded `redb` database.
//!
//! All items live in a single table whose keys and values are raw byte
//! slices. `redb` orders `&[u8]` keys lexicographically, so the table's key
//! order is the queue order. Every write runs in its own transaction and is
//! committed before [`put`](OrderedStore::put) returns.
//!
//! # On-Disk Layout
//!
//! ```text
//! <queue dir>/queue.redb    table "items": [8-byte big-endian id] -> payload
//! ```

use super::OrderedStore;
use crate::queue::error::StoreError;
use crate::queue::options::{Durability, QueueOptions};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the database file inside a queue directory.
pub const DATABASE_FILE: &str = "queue.redb";

const ITEMS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("items");

/// An [`OrderedStore`] persisted in a `redb` database file.
pub struct RedbStore {
    /// `None` once the store has been closed.
    db: Option<Database>,
    durability: redb::Durability,
    path: PathBuf,
}

impl RedbStore {
    /// Open or create the database file inside `dir`.
    ///
    /// The directory must already exist. The items table is created if the
    /// database is new.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or the items
    /// table cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P, options: &QueueOptions) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(DATABASE_FILE);

        let mut builder = Database::builder();
        if let Some(bytes) = options.cache_size_bytes {
            builder.set_cache_size(bytes);
        }
        let db = builder.create(&path).map_err(StoreError::backend)?;

        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        write_txn
            .open_table(ITEMS_TABLE)
            .map_err(StoreError::backend)?;
        write_txn.commit().map_err(StoreError::backend)?;

        debug!(path = %path.display(), "opened redb store");

        Ok(Self {
            db: Some(db),
            durability: match options.durability {
                Durability::Immediate => redb::Durability::Immediate,
                Durability::Eventual => redb::Durability::Eventual,
            },
            path,
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    fn db(&self) -> Result<&Database, StoreError> {
        self.db.as_ref().ok_or(StoreError::Closed)
    }

    /// Run `write` against the items table in a single committed
    /// transaction.
    fn write_with<F>(&self, write: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut redb::Table<'_, &'static [u8], &'static [u8]>) -> Result<(), StoreError>,
    {
        let mut write_txn = self.db()?.begin_write().map_err(StoreError::backend)?;
        write_txn.set_durability(self.durability);
        {
            let mut table = write_txn
                .open_table(ITEMS_TABLE)
                .map_err(StoreError::backend)?;
            write(&mut table)?;
        }
        write_txn.commit().map_err(StoreError::backend)
    }

    /// Read the first or last key of the items table.
    fn edge_key(&self, last: bool) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db()?.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(StoreError::backend)?;

        let edge = if last {
            table.last().map_err(StoreError::backend)?
        } else {
            table.first().map_err(StoreError::backend)?
        };

        Ok(edge.map(|(key, _value)| key.value().to_vec()))
    }
}

impl OrderedStore for RedbStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.write_with(|table| {
            table.insert(key, value).map_err(StoreError::backend)?;
            Ok(())
        })
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db()?.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(StoreError::backend)?;

        let value = table.get(key).map_err(StoreError::backend)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.write_with(|table| {
            table.remove(key).map_err(StoreError::backend)?;
            Ok(())
        })
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.edge_key(false)
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.edge_key(true)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if let Some(db) = self.db.take() {
            drop(db);
            debug!(path = %self.path.display(), "closed redb store");
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .field("open", &self.db.is_some())
            .finish()
    }
}
