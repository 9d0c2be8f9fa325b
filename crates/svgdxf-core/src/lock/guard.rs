//! RAII lock guard for automatic lock release

use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// RAII guard for an exclusive file lock
///
/// Dropping the guard unlocks and closes the file, so the lock is released
/// on every exit path: early returns, `?`, cancelled futures and panics.
#[derive(Debug)]
pub struct LockGuard {
    pub(crate) file: File,
    pub(crate) path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock as well; unlock explicitly
        // so the release does not wait on other handles to the same file.
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::debug!("unlock of {} failed: {}", self.path.display(), e);
        }
        tracing::trace!("released lock {}", self.path.display());
    }
}
