//! Shared helpers for the integration tests.

use ledgerq::{MemoryStore, OrderedStore, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Switches shared between a test and the [`FlakyStore`] it handed to a
/// queue.
#[derive(Debug, Default)]
pub struct Faults {
    pub fail_put: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_close: AtomicBool,
    /// Every call into the store, failed or not.
    pub calls: AtomicUsize,
}

impl Faults {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }
}

/// A [`MemoryStore`] that counts calls and fails on demand.
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    faults: Arc<Faults>,
}

impl FlakyStore {
    pub fn new() -> (Self, Arc<Faults>) {
        let faults = Arc::new(Faults::default());
        (
            Self {
                inner: MemoryStore::new(),
                faults: Arc::clone(&faults),
            },
            faults,
        )
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        self.faults.calls.fetch_add(1, Ordering::SeqCst);
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::backend(format!("injected {op} failure")));
        }
        Ok(())
    }
}

impl OrderedStore for FlakyStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check(&self.faults.fail_put, "put")?;
        self.inner.put(key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.check(&self.faults.fail_get, "get")?;
        self.inner.get(key)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.check(&self.faults.fail_put, "delete")?;
        self.inner.delete(key)
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.check(&self.faults.fail_get, "first_key")?;
        self.inner.first_key()
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.check(&self.faults.fail_get, "last_key")?;
        self.inner.last_key()
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.check(&self.faults.fail_close, "close")?;
        self.inner.close()
    }
}

/// Create a temporary directory, panicking with a readable message if the
/// platform refuses.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
