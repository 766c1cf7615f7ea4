/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! The multi-cursor FIFO queue.
//!
//! A [`Queue`] maps a logical queue onto an [`OrderedStore`]: item `n` is
//! stored under the big-endian encoding of `n`, so the store's key order is
//! insertion order. The queue keeps three pieces of in-memory state:
//!
//! - `baseline`: one less than the oldest id present when the queue was
//!   opened; every new cursor starts here.
//! - `tail`: the id of the newest item.
//! - `heads`: for each cursor, the id of the last item it returned.
//!
//! None of this is persisted separately. On open, `baseline` and `tail` are
//! re-derived from the first and last keys in the store, so there is no
//! metadata record that could disagree with the data after a crash.
//! Cursors live in memory only and restart from `baseline` after a reopen.
//!
//! Dequeue never deletes: it moves a cursor forward. Any number of cursors
//! read the same items independently.

use super::error::QueueError;
use super::item::Item;
use super::key::{KEY_WIDTH, decode_key, encode_id};
use super::marker::{self, StructureKind};
use super::metrics;
use super::options::QueueOptions;
use super::store::{OrderedStore, RedbStore};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace, warn};

/// In-memory queue state, guarded by the queue lock together with the
/// store handle.
#[derive(Debug)]
struct QueueState<S> {
    store: S,
    baseline: u64,
    tail: u64,
    heads: Vec<u64>,
    open: bool,
}

impl<S> QueueState<S> {
    /// Head of `cursor`, creating every missing cursor up to it at
    /// `baseline`.
    fn head_or_init(&mut self, cursor: usize) -> u64 {
        if cursor >= self.heads.len() {
            debug!(
                cursor,
                created = cursor + 1 - self.heads.len(),
                baseline = self.baseline,
                "initializing cursors"
            );
            self.heads.resize(cursor + 1, self.baseline);
        }
        self.heads[cursor]
    }

    fn ensure_open(&self) -> Result<(), QueueError> {
        if !self.open {
            return Err(QueueError::Closed);
        }
        Ok(())
    }
}

/// A durable FIFO queue with independent read cursors.
///
/// All operations are synchronous. A single [`RwLock`] guards the queue
/// state and the store handle: [`enqueue`](Queue::enqueue),
/// [`dequeue`](Queue::dequeue), [`close`](Queue::close) and
/// [`destroy`](Queue::destroy) hold it exclusively for their whole duration
/// (dequeue too, since it moves a cursor and may create new ones), while
/// the read-only accessors share it. Share a queue between threads with an
/// `Arc<Queue>`.
///
/// # Example
///
/// ```rust,no_run
/// use ledgerq::{Queue, QueueError};
///
/// # fn example() -> Result<(), QueueError> {
/// let queue = Queue::open("/tmp/jobs")?;
/// queue.enqueue_str("resize:42")?;
///
/// // Cursor 0 and cursor 1 each see every item.
/// let item = queue.dequeue(0)?;
/// assert_eq!(item.as_str()?, "resize:42");
/// assert_eq!(queue.dequeue(1)?.id, item.id);
///
/// assert!(matches!(queue.dequeue(0), Err(QueueError::Empty { .. })));
/// queue.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Queue<S = RedbStore> {
    dir: PathBuf,
    max_cursors: usize,
    state: RwLock<QueueState<S>>,
}

impl Queue<RedbStore> {
    /// Open the queue stored in `dir`, creating an empty one if the
    /// directory holds none.
    ///
    /// # Errors
    ///
    /// See [`open_with_options`](Queue::open_with_options).
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, QueueError> {
        Self::open_with_options(dir, QueueOptions::default())
    }

    /// Open or create the queue stored in `dir` with custom options.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Io`] if the directory cannot be created
    /// - [`QueueError::StoreOpenFailed`] if the database cannot be opened
    /// - [`QueueError::IncompatibleType`] if the directory belongs to
    ///   another structure
    /// - [`QueueError::StoreReadFailed`] / [`QueueError::MalformedKey`] if
    ///   recovery cannot read the stored keys
    pub fn open_with_options<P: AsRef<Path>>(
        dir: P,
        options: QueueOptions,
    ) -> Result<Self, QueueError> {
        let dir = dir.as_ref();
        create_dir(dir)?;
        // Reject a foreign directory before the database file is created in it.
        marker::verify(dir, StructureKind::FifoQueue)?;
        let store = RedbStore::open(dir, &options).map_err(|e| {
            warn!(dir = %dir.display(), error = %e, "failed to open queue store");
            QueueError::StoreOpenFailed(e)
        })?;
        Self::with_store(dir, store, options)
    }
}

impl<S: OrderedStore> Queue<S> {
    /// Build a queue over an already opened store.
    ///
    /// `dir` is the queue directory: it is created if missing, it carries
    /// the structure marker and it is what [`destroy`](Queue::destroy)
    /// deletes. Recovery runs against `store` before this returns.
    ///
    /// # Errors
    ///
    /// Same as [`Queue::open_with_options`], minus the store opening.
    pub fn with_store<P: AsRef<Path>>(
        dir: P,
        mut store: S,
        options: QueueOptions,
    ) -> Result<Self, QueueError> {
        let dir = dir.as_ref().to_path_buf();

        // The marker is only written once recovery has accepted the store.
        let prepared = create_dir(&dir)
            .and_then(|()| marker::verify(&dir, StructureKind::FifoQueue))
            .and_then(|_| recover(&store))
            .and_then(|bounds| {
                marker::claim(&dir, StructureKind::FifoQueue)?;
                Ok(bounds)
            });

        let (baseline, tail) = match prepared {
            Ok(bounds) => bounds,
            Err(err) => {
                // The store was opened for us; do not leave it open behind a
                // failed constructor.
                let _ = store.close();
                return Err(err);
            }
        };

        info!(dir = %dir.display(), baseline, tail, "opened queue");
        metrics::record_tail(tail);

        Ok(Self {
            dir,
            max_cursors: options.max_cursors,
            state: RwLock::new(QueueState {
                store,
                baseline,
                tail,
                heads: Vec::new(),
                open: true,
            }),
        })
    }

    /// Append `value` to the queue and return the stored item.
    ///
    /// The new item gets id `tail + 1`. The in-memory tail only moves once
    /// the store has committed the write, so a failed write leaves the
    /// queue exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Closed`] if the queue is closed
    /// - [`QueueError::SequenceExhausted`] if the tail is `u64::MAX`
    /// - [`QueueError::StoreWriteFailed`] if the store rejects the write
    pub fn enqueue(&self, value: &[u8]) -> Result<Item, QueueError> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        state.ensure_open()?;

        let id = state
            .tail
            .checked_add(1)
            .ok_or(QueueError::SequenceExhausted)?;
        let key = encode_id(id);

        if let Err(e) = state.store.put(&key, value) {
            warn!(id, error = %e, "enqueue write failed");
            return Err(QueueError::StoreWriteFailed(e));
        }
        state.tail = id;

        trace!(id, len = value.len(), "enqueued item");
        metrics::record_enqueue(id);

        Ok(Item {
            id,
            key,
            value: value.to_vec(),
        })
    }

    /// Append a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Same as [`enqueue`](Queue::enqueue).
    pub fn enqueue_str(&self, value: &str) -> Result<Item, QueueError> {
        self.enqueue(value.as_bytes())
    }

    /// Append `value` encoded as JSON. Read it back with
    /// [`Item::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Serialization`] if `value` cannot be encoded,
    /// otherwise the same as [`enqueue`](Queue::enqueue).
    pub fn enqueue_json<T: Serialize>(&self, value: &T) -> Result<Item, QueueError> {
        let bytes = serde_json::to_vec(value)?;
        self.enqueue(&bytes)
    }

    /// Append `value` in bincode's compact binary encoding. Read it back
    /// with [`Item::to_object`].
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Serialization`] if `value` cannot be encoded,
    /// otherwise the same as [`enqueue`](Queue::enqueue).
    #[cfg(feature = "bincode")]
    pub fn enqueue_object<T: Serialize>(&self, value: &T) -> Result<Item, QueueError> {
        let bytes = super::item::encode_object(value)?;
        self.enqueue(&bytes)
    }

    /// Return the next item for `cursor` and advance it.
    ///
    /// A cursor index that has never been used starts at the baseline, and
    /// so does every unused index below it. The item is not removed; other
    /// cursors still see it.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Closed`] if the queue is closed
    /// - [`QueueError::CursorOutOfRange`] if `cursor` is not below the
    ///   configured maximum
    /// - [`QueueError::Empty`] if the cursor has caught up with the tail
    /// - [`QueueError::StoreReadFailed`] if the store cannot be read
    ///
    /// The cursor does not move on any error.
    pub fn dequeue(&self, cursor: usize) -> Result<Item, QueueError> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        state.ensure_open()?;

        if cursor >= self.max_cursors {
            return Err(QueueError::CursorOutOfRange {
                cursor,
                max: self.max_cursors,
            });
        }

        let head = state.head_or_init(cursor);
        let Some(next) = head.checked_add(1) else {
            metrics::record_empty();
            return Err(QueueError::Empty { cursor });
        };
        let key = encode_id(next);

        let value = match state.store.get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                trace!(cursor, head, "cursor caught up");
                metrics::record_empty();
                return Err(QueueError::Empty { cursor });
            }
            Err(e) => {
                warn!(cursor, id = next, error = %e, "dequeue read failed");
                return Err(QueueError::StoreReadFailed(e));
            }
        };
        state.heads[cursor] = next;

        trace!(cursor, id = next, "dequeued item");
        metrics::record_dequeue();

        Ok(Item {
            id: next,
            key,
            value,
        })
    }

    /// Close the queue and its store.
    ///
    /// Closing an already closed queue succeeds without doing anything.
    /// After a successful close every operation fails with
    /// [`QueueError::Closed`]; reopen the directory to use the queue again.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StoreCloseFailed`] if the store cannot be
    /// closed. The queue stays open in that case, so the call can be
    /// retried.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        if !state.open {
            return Ok(());
        }

        state.store.close().map_err(|e| {
            warn!(dir = %self.dir.display(), error = %e, "failed to close queue store");
            QueueError::StoreCloseFailed(e)
        })?;

        state.baseline = 0;
        state.tail = 0;
        state.heads.clear();
        state.open = false;

        info!(dir = %self.dir.display(), "closed queue");
        Ok(())
    }

    /// Close the queue and delete its directory with everything in it.
    ///
    /// Opening the same path afterwards yields a new, empty queue.
    ///
    /// # Errors
    ///
    /// Returns the [`close`](Queue::close) error without deleting anything
    /// if the queue cannot be closed, or [`QueueError::Io`] if the
    /// directory cannot be removed. A directory that is already gone is not
    /// an error.
    pub fn destroy(&self) -> Result<(), QueueError> {
        self.close()?;

        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(QueueError::io_at(e, &self.dir)),
        }

        info!(dir = %self.dir.display(), "destroyed queue");
        Ok(())
    }

    /// Id of the newest item, or `0` if the queue has never held one.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed.
    pub fn tail(&self) -> Result<u64, QueueError> {
        let state = self.read_state()?;
        state.ensure_open()?;
        Ok(state.tail)
    }

    /// Position new cursors start from: one less than the oldest id present
    /// when the queue was opened.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed.
    pub fn baseline(&self) -> Result<u64, QueueError> {
        let state = self.read_state()?;
        state.ensure_open()?;
        Ok(state.baseline)
    }

    /// Id of the last item `cursor` returned, or `None` if the cursor has
    /// never been used.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed.
    pub fn cursor_position(&self, cursor: usize) -> Result<Option<u64>, QueueError> {
        let state = self.read_state()?;
        state.ensure_open()?;
        Ok(state.heads.get(cursor).copied())
    }

    /// Number of cursor slots created so far.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed.
    pub fn cursor_count(&self) -> Result<usize, QueueError> {
        let state = self.read_state()?;
        state.ensure_open()?;
        Ok(state.heads.len())
    }

    /// Number of items `cursor` has not returned yet. Does not create the
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed.
    pub fn pending(&self, cursor: usize) -> Result<u64, QueueError> {
        let state = self.read_state()?;
        state.ensure_open()?;
        let head = state.heads.get(cursor).copied().unwrap_or(state.baseline);
        Ok(state.tail.saturating_sub(head))
    }

    /// Returns `true` until the queue has been closed.
    ///
    /// A poisoned lock does not close the queue, so this still reports the
    /// last recorded state even though the other operations fail with
    /// [`QueueError::LockPoisoned`].
    #[must_use]
    pub fn is_open(&self) -> bool {
        match self.state.read() {
            Ok(state) => state.open,
            Err(poisoned) => poisoned.into_inner().open,
        }
    }

    /// The queue directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    #[inline]
    fn write_state(&self) -> Result<RwLockWriteGuard<'_, QueueState<S>>, QueueError> {
        self.state.write().map_err(|_| QueueError::LockPoisoned)
    }

    #[inline]
    fn read_state(&self) -> Result<RwLockReadGuard<'_, QueueState<S>>, QueueError> {
        self.state.read().map_err(|_| QueueError::LockPoisoned)
    }
}

impl<S> std::fmt::Debug for Queue<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Queue");
        out.field("dir", &self.dir);
        if let Ok(state) = self.state.read() {
            out.field("open", &state.open)
                .field("baseline", &state.baseline)
                .field("tail", &state.tail)
                .field("heads", &state.heads);
        }
        out.finish()
    }
}

fn create_dir(dir: &Path) -> Result<(), QueueError> {
    fs::create_dir_all(dir).map_err(|e| QueueError::io_at(e, dir))
}

/// Derive `(baseline, tail)` from the first and last keys in `store`.
fn recover<S: OrderedStore>(store: &S) -> Result<(u64, u64), QueueError> {
    let mut baseline = 0;
    let mut tail = 0;

    if let Some(first) = store.first_key().map_err(QueueError::StoreReadFailed)? {
        // Ids start at 1; a zero key was not written by a queue.
        baseline = decode_key(&first)?
            .checked_sub(1)
            .ok_or(QueueError::MalformedKey { len: KEY_WIDTH })?;
    }

    if let Some(last) = store.last_key().map_err(QueueError::StoreReadFailed)? {
        tail = decode_key(&last)?;
    }

    debug!(baseline, tail, "recovered queue bounds");
    Ok((baseline, tail))
}
