//! Error types for the queue and its storage adapter.
//!
//! [`QueueError`] is what every public queue operation returns. Failures
//! reported by an [`OrderedStore`](super::store::OrderedStore) are carried
//! as [`StoreError`] inside the queue variant naming the operation that
//! failed, so callers can tell a failed write from a failed read.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by an ordered store implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The storage backend reported a failure.
    #[error("store backend error: {message}")]
    Backend {
        /// The backend's error message.
        message: String,
    },

    /// The store was used after it had been closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Wrap any backend error as [`StoreError::Backend`].
    #[cold]
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

/// Errors that can occur while operating a queue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueueError {
    /// The operation was attempted on a queue that is not open.
    #[error("queue is closed")]
    Closed,

    /// The cursor has already returned every available item.
    #[error("queue is empty for cursor {cursor}")]
    Empty {
        /// The cursor index that was read.
        cursor: usize,
    },

    /// A key read from the store does not decode to a sequence number.
    #[error("malformed key: expected 8 bytes, got {len}")]
    MalformedKey {
        /// Length in bytes of the offending key.
        len: usize,
    },

    /// The store could not be opened.
    #[error("failed to open store: {0}")]
    StoreOpenFailed(#[source] StoreError),

    /// The store rejected a write.
    #[error("failed to write to store: {0}")]
    StoreWriteFailed(#[source] StoreError),

    /// The store failed to serve a read.
    #[error("failed to read from store: {0}")]
    StoreReadFailed(#[source] StoreError),

    /// The store could not be closed.
    #[error("failed to close store: {0}")]
    StoreCloseFailed(#[source] StoreError),

    /// The directory holds a structure other than a FIFO queue.
    #[error("incompatible structure in queue directory (marker {found:?})")]
    IncompatibleType {
        /// The raw marker bytes found on disk.
        found: Vec<u8>,
    },

    /// A filesystem operation on the queue directory failed.
    #[error("queue I/O error{}: {message}", at_path(.path))]
    Io {
        /// The underlying I/O error message.
        message: String,
        /// The path involved, if known.
        path: Option<PathBuf>,
    },

    /// A structured payload could not be encoded or decoded.
    #[error("payload serialization error: {message}")]
    Serialization {
        /// The underlying serializer message.
        message: String,
    },

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    /// Every sequence number has been assigned.
    #[error("sequence numbers exhausted")]
    SequenceExhausted,

    /// The cursor index is beyond the configured maximum.
    #[error("cursor {cursor} out of range (max {max})")]
    CursorOutOfRange {
        /// The requested cursor index.
        cursor: usize,
        /// The configured number of cursors.
        max: usize,
    },

    /// The queue lock was poisoned (another thread panicked while holding
    /// it).
    #[error("queue lock poisoned")]
    LockPoisoned,
}

fn at_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl QueueError {
    /// Build an [`QueueError::Io`] for a known path.
    #[cold]
    pub(crate) fn io_at(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        QueueError::Io {
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for QueueError {
    #[cold]
    fn from(err: std::io::Error) -> Self {
        QueueError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for QueueError {
    #[cold]
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization {
            message: err.to_string(),
        }
    }
}
