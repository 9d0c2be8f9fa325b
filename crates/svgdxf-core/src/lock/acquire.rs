//! Lock acquisition logic with fixed-delay retry and cancellation

use super::{LockError, LockGuard, LockOptions};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const PROGRESS_MESSAGE_THRESHOLD: Duration = Duration::from_secs(2);

/// Attempts to acquire an exclusive lock, retrying until success, timeout or cancellation
pub(crate) async fn acquire_with_retry(
    lock_path: &Path,
    options: &LockOptions,
    token: &CancellationToken,
) -> Result<LockGuard, LockError> {
    // Create parent directories if needed
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(|e| LockError::Io {
            source: e,
            path: lock_path.to_path_buf(),
            operation: "create parent directories".to_string(),
        })?;
    }

    let start = Instant::now();
    let mut progress_shown = false;

    loop {
        if token.is_cancelled() {
            return Err(LockError::Cancelled {
                path: lock_path.to_path_buf(),
            });
        }

        // Create-if-absent; the content of the file is never read
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| LockError::Io {
                source: e,
                path: lock_path.to_path_buf(),
                operation: "open lock file".to_string(),
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::trace!("acquired lock {}", lock_path.display());
                return Ok(LockGuard {
                    file,
                    path: lock_path.to_path_buf(),
                });
            }
            Err(e) if is_contended(&e) => {
                // Held by another handle (this process or another one)
                drop(file);
                let elapsed = start.elapsed();

                if let Some(timeout) = options.timeout {
                    if elapsed >= timeout {
                        return Err(LockError::Timeout {
                            path: lock_path.to_path_buf(),
                            description: options.description.clone(),
                        });
                    }
                }

                if !progress_shown && elapsed >= PROGRESS_MESSAGE_THRESHOLD {
                    tracing::info!(
                        "Waiting for lock on {} ({})...",
                        lock_path.display(),
                        options.description
                    );
                    progress_shown = true;
                }

                tokio::select! {
                    _ = token.cancelled() => {
                        return Err(LockError::Cancelled {
                            path: lock_path.to_path_buf(),
                        });
                    }
                    _ = tokio::time::sleep(options.retry_delay) => {}
                }
            }
            Err(e) => {
                return Err(LockError::Io {
                    source: e,
                    path: lock_path.to_path_buf(),
                    operation: "acquire lock".to_string(),
                });
            }
        }
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
