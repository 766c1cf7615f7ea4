//! Durable multi-cursor FIFO queue over an ordered key-value store.

pub mod error;
/// The queue itself: recovery, enqueue, dequeue and lifecycle.
pub mod fifo;
pub mod item;
/// Order-preserving encoding of sequence numbers into store keys.
pub mod key;
/// Structure marker guarding a queue directory.
pub mod marker;
/// Metric names published with the `metrics` feature.
pub mod metrics;
pub mod options;
/// Ordered store adapter and its implementations.
pub mod store;

pub use error::{QueueError, StoreError};
pub use fifo::Queue;
pub use item::Item;
pub use key::{KEY_WIDTH, decode_key, encode_id};
pub use options::{DEFAULT_MAX_CURSORS, Durability, QueueOptions};
pub use store::{MemoryStore, OrderedStore, RedbStore};
