//! One-time warmup of the self-extracting dxf_outlines executable.
//!
//! The first launch of the tool unpacks itself, which is slow and must not
//! happen twice at the same time. [`WarmupCoordinator::ensure_warmed_up`]
//! runs `<tool> --help` once per process, serialized:
//!
//! ```text
//! ensure_warmed_up()
//!     ↓
//! 1. flag set? → return (no I/O)
//!     ↓
//! 2. in-process gate (tokio mutex), re-check flag
//!     ↓
//! 3. exclusive file lock in temp dir, retry every 100ms, re-check flag
//!     ↓
//! 4. run `<tool> --help`, exit code ignored
//!     ↓
//! 5. set flag; lock and gate released on drop
//! ```

use crate::Result;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use svgdxf_core::config::consts;
use svgdxf_core::lock::{LockOptions, acquire_lock};
use svgdxf_core::{Config, SvgDxfError};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

static GLOBAL: LazyLock<Arc<WarmupCoordinator>> =
    LazyLock::new(|| Arc::new(WarmupCoordinator::from_config(&Config::default())));

/// Process-wide coordinator using the default lock path
pub fn global() -> Arc<WarmupCoordinator> {
    Arc::clone(&*GLOBAL)
}

#[derive(Debug)]
pub struct WarmupCoordinator {
    /// Only ever goes false → true
    warmed_up: AtomicBool,
    gate: Mutex<()>,
    lock_path: PathBuf,
    lock_options: LockOptions,
}

impl WarmupCoordinator {
    pub fn new(lock_path: impl Into<PathBuf>) -> Self {
        Self {
            warmed_up: AtomicBool::new(false),
            gate: Mutex::new(()),
            lock_path: lock_path.into(),
            lock_options: LockOptions::new("dxf_outlines warmup"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut options =
            LockOptions::new("dxf_outlines warmup").with_retry_delay(config.warmup.retry_delay());
        options.timeout = config.warmup.timeout();
        Self::new(config.lock_path()).with_lock_options(options)
    }

    pub fn with_lock_options(mut self, lock_options: LockOptions) -> Self {
        self.lock_options = lock_options;
        self
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Same lock path, retry delay and timeout as `config` would produce
    pub fn matches_config(&self, config: &Config) -> bool {
        self.lock_path == config.lock_path()
            && self.lock_options.retry_delay == config.warmup.retry_delay()
            && self.lock_options.timeout == config.warmup.timeout()
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up.load(Ordering::Acquire)
    }

    /// Returns once `executable` has been warmed up by this process.
    ///
    /// Cancellation while waiting for the gate, the lock or the warmup run
    /// returns [`SvgDxfError::Cancelled`] and leaves the flag unset.
    pub async fn ensure_warmed_up(
        &self,
        executable: &Path,
        token: &CancellationToken,
    ) -> Result<()> {
        if self.is_warmed_up() {
            return Ok(());
        }
        if token.is_cancelled() {
            return Err(SvgDxfError::Cancelled);
        }

        let _gate = tokio::select! {
            _ = token.cancelled() => return Err(SvgDxfError::Cancelled),
            gate = self.gate.lock() => gate,
        };
        if self.is_warmed_up() {
            return Ok(());
        }

        let _lock = acquire_lock(&self.lock_path, &self.lock_options, token).await?;
        if self.is_warmed_up() {
            return Ok(());
        }

        run_warmup(executable, token).await?;
        self.warmed_up.store(true, Ordering::Release);
        tracing::debug!("dxf_outlines warmed up ({})", executable.display());
        Ok(())
    }
}

async fn run_warmup(executable: &Path, token: &CancellationToken) -> Result<()> {
    tracing::debug!(
        "warming up {} {}",
        executable.display(),
        consts::tool::WARMUP_ARG
    );

    let mut child = Command::new(executable)
        .arg(consts::tool::WARMUP_ARG)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SvgDxfError::SpawnFailed {
            path: executable.to_path_buf(),
            source: e,
        })?;

    // The child is killed on drop if cancellation wins
    let status = tokio::select! {
        _ = token.cancelled() => return Err(SvgDxfError::Cancelled),
        status = child.wait() => status?,
    };

    // Exit status only matters as "the process ran to completion"
    tracing::debug!("warmup exited with {}", status);
    Ok(())
}
