//! File locking module for process-level mutual exclusion
//!
//! This module provides advisory file locks using the fs2 crate so that
//! independently started processes do not run the same one-time work
//! concurrently. Waiting is asynchronous: the retry delay is a tokio sleep
//! and every wait observes a [`CancellationToken`].

use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod acquire;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;


/// Fixed delay between acquisition attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How an acquisition waits for a contended lock
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// Delay between attempts while the lock is held elsewhere
    pub retry_delay: Duration,
    /// Give up after this long; `None` waits until success or cancellation
    pub timeout: Option<Duration>,
    /// Human-readable description for progress messages and errors
    pub description: String,
}

impl LockOptions {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: None,
            description: description.into(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Acquires an exclusive lock on the specified path.
///
/// The lock file is created if absent. While another handle holds the lock
/// the call sleeps for `options.retry_delay` and tries again, until the lock
/// is obtained, `options.timeout` elapses, or `token` is cancelled.
///
/// # Returns
///
/// Returns a `LockGuard` on success, which releases the lock when dropped.
/// Returns `LockError::Cancelled` if the token fired while waiting,
/// `LockError::Timeout` on timeout, and `LockError::Io` on I/O errors.
///
/// # Examples
///
/// ```no_run
/// use svgdxf_core::lock::{acquire_lock, LockOptions};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let lock_path = std::env::temp_dir().join("my.lock");
/// let token = CancellationToken::new();
/// let guard = acquire_lock(&lock_path, &LockOptions::new("my operation"), &token).await?;
/// // Critical section here
/// drop(guard);
/// # Ok(())
/// # }
/// ```
pub async fn acquire_lock(
    lock_path: &Path,
    options: &LockOptions,
    token: &CancellationToken,
) -> Result<LockGuard, LockError> {
    acquire::acquire_with_retry(lock_path, options, token).await
}
