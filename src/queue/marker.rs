//! Structure marker kept alongside the store.
//!
//! Several logical structures can be built on the same storage primitive.
//! Each queue directory carries a one-byte marker file naming the structure
//! that created it so a directory is never opened as the wrong kind.

use super::error::QueueError;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the marker inside a queue directory.
pub const MARKER_FILE: &str = "LEDGERQ_KIND";

/// Logical structures that can own a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StructureKind {
    /// A multi-cursor FIFO queue.
    FifoQueue = 1,
}

impl StructureKind {
    /// The byte written to the marker file.
    #[must_use]
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE)
}

/// Check the marker in `dir` against `kind` without writing anything.
///
/// Returns `true` if the directory already carries the marker for `kind`
/// and `false` if it carries none.
///
/// # Errors
///
/// Returns [`QueueError::IncompatibleType`] if the marker names another
/// structure, or [`QueueError::Io`] if the marker cannot be read.
pub fn verify(dir: &Path, kind: StructureKind) -> Result<bool, QueueError> {
    let path = marker_path(dir);

    match fs::read(&path) {
        Ok(found) if found == [kind.tag()] => Ok(true),
        Ok(found) => {
            warn!(path = %path.display(), ?found, "structure marker mismatch");
            Err(QueueError::IncompatibleType { found })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(QueueError::io_at(e, path)),
    }
}

/// Verify that `dir` belongs to `kind`, claiming it if it carries no marker.
///
/// # Errors
///
/// Same as [`verify`], plus [`QueueError::Io`] if the marker cannot be
/// written.
pub fn claim(dir: &Path, kind: StructureKind) -> Result<(), QueueError> {
    if verify(dir, kind)? {
        return Ok(());
    }
    let path = marker_path(dir);
    write_marker(&path, kind)?;
    debug!(path = %path.display(), ?kind, "wrote structure marker");
    Ok(())
}

fn write_marker(path: &Path, kind: StructureKind) -> Result<(), QueueError> {
    let mut file = File::create(path).map_err(|e| QueueError::io_at(e, path))?;
    file.write_all(&[kind.tag()])
        .map_err(|e| QueueError::io_at(e, path))?;
    file.sync_all().map_err(|e| QueueError::io_at(e, path))
}
