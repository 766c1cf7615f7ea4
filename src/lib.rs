//! # Durable Multi-Cursor FIFO Queue
//!
//! `ledgerq` is an embedded, crash-durable FIFO queue for local processes that
//! need reliable queueing without running a broker. Producers append opaque
//! byte payloads; any number of consumers read them back in strict insertion
//! order, each through its own cursor, without disturbing one another.
//!
//! ## Key Features
//!
//! - **Durable**: every enqueue is committed to an embedded `redb` database
//!   before it returns.
//! - **Multi-Cursor Reads**: cursors are plain indices. Cursor `0` and cursor
//!   `1` both read the whole queue; dequeue moves a cursor, it never deletes.
//! - **Self-Healing Recovery**: the oldest and newest sequence numbers are
//!   re-derived from the stored keys on every open. There is no separate
//!   metadata record to fall out of sync after a crash.
//! - **Pluggable Storage**: the queue talks to its store through the
//!   [`OrderedStore`] trait. [`RedbStore`] persists to disk and
//!   [`MemoryStore`] keeps everything in memory.
//! - **Payload Helpers**: strings, JSON (`serde_json`) and, with the `bincode`
//!   feature, compact binary objects.
//!
//! ## Data Model
//!
//! Each item gets a sequence number: the first item ever enqueued is `1`, the
//! next `2`, and so on, with no reuse. Items are stored under the 8-byte
//! big-endian encoding of their id, so the store's byte order is the queue
//! order.
//!
//! | State | Meaning |
//! |---|---|
//! | `baseline` | one less than the oldest id present when the queue was opened |
//! | `tail` | id of the newest item (`0` when empty) |
//! | `heads[i]` | id of the last item cursor `i` returned |
//!
//! Cursors are created on first use at `baseline` and live in memory only:
//! after a reopen every cursor starts over from the recovered baseline.
//!
//! ## Concurrency
//!
//! All operations are synchronous and guarded by a single reader/writer lock.
//! Enqueue, dequeue, close and destroy are serialized; accessors such as
//! [`Queue::tail`] share the lock. Wrap the queue in an `Arc` to use it from
//! several threads. Dequeue never blocks: a cursor that has caught up gets
//! [`QueueError::Empty`] immediately.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ledgerq::prelude::*;
//!
//! # fn example() -> Result<(), QueueError> {
//! let queue = Queue::open("/tmp/ledgerq-demo")?;
//!
//! queue.enqueue_str("a")?;
//! queue.enqueue_str("b")?;
//!
//! assert_eq!(queue.dequeue(0)?.as_str()?, "a");
//! assert_eq!(queue.dequeue(0)?.as_str()?, "b");
//! assert!(matches!(queue.dequeue(0), Err(QueueError::Empty { .. })));
//!
//! // An independent consumer still sees everything.
//! assert_eq!(queue.dequeue(1)?.id, 1);
//!
//! queue.close()?;
//!
//! // Reopening keeps the items; cursors start over.
//! let queue = Queue::open("/tmp/ledgerq-demo")?;
//! assert_eq!(queue.tail()?, 2);
//! assert_eq!(queue.dequeue(0)?.as_str()?, "a");
//!
//! // Remove every trace of the queue from disk.
//! queue.destroy()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bincode`: `Queue::enqueue_object` and `Item::to_object`.
//! - `metrics`: counters and gauges published through the `metrics` facade
//!   (see [`queue::metrics`]).
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Opens,
//! closes and destroys are logged at `info`, cursor creation and recovery
//! at `debug`, and each enqueue/dequeue at `trace`.

pub mod queue;

pub mod prelude;

pub use queue::error::{QueueError, StoreError};
pub use queue::fifo::Queue;
pub use queue::item::Item;
pub use queue::key::{KEY_WIDTH, decode_key, encode_id};
pub use queue::marker::{MARKER_FILE, StructureKind};
pub use queue::options::{DEFAULT_MAX_CURSORS, Durability, QueueOptions};
pub use queue::store::{MemoryStore, OrderedStore, RedbStore};

/// A queue persisted in an embedded `redb` database.
pub type DefaultQueue = Queue<RedbStore>;

/// A queue held entirely in memory.
pub type MemoryQueue = Queue<MemoryStore>;
