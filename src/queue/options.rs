//! Queue configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on the number of cursors a queue tracks.
pub const DEFAULT_MAX_CURSORS: usize = 1024;

/// How hard each enqueue pushes its write to disk before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Every enqueue is fsynced before it returns.
    #[default]
    Immediate,
    /// Writes are committed but flushed to disk lazily. A crash may lose the
    /// most recent items; it never reorders or corrupts older ones.
    Eventual,
}

/// Options used when opening a queue.
///
/// Options can be built in code with the `with_*` methods or deserialized
/// from any serde format:
///
/// ```rust
/// use ledgerq::{Durability, QueueOptions};
///
/// let options = QueueOptions::default()
///     .with_durability(Durability::Eventual)
///     .with_max_cursors(16);
/// assert_eq!(options.max_cursors, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    /// Page cache size handed to the embedded store, in bytes. `None` keeps
    /// the store's default.
    pub cache_size_bytes: Option<usize>,
    /// Commit durability of each enqueue.
    pub durability: Durability,
    /// Cursor indices must be strictly below this value.
    pub max_cursors: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            cache_size_bytes: None,
            durability: Durability::default(),
            max_cursors: DEFAULT_MAX_CURSORS,
        }
    }
}

impl QueueOptions {
    /// Set the store page cache size in bytes.
    #[must_use]
    pub fn with_cache_size(mut self, bytes: usize) -> Self {
        self.cache_size_bytes = Some(bytes);
        self
    }

    /// Set the commit durability of each enqueue.
    #[must_use]
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    /// Set the maximum number of cursors.
    #[must_use]
    pub fn with_max_cursors(mut self, max_cursors: usize) -> Self {
        self.max_cursors = max_cursors;
        self
    }
}
