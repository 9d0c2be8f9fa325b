use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvgDxfError {
    // Platform errors
    #[error("UNSUPPORTED_PLATFORM: no dxf_outlines build for os '{os}' / arch '{arch}'")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("EXECUTABLE_NOT_FOUND: '{}' does not exist (target {target})", path.display())]
    ExecutableNotFound { path: PathBuf, target: String },

    // Invocation errors
    #[error("INVALID_ARGUMENT: {0}")]
    InvalidArgument(String),

    #[error("CONVERSION_FAILED: dxf_outlines exited with code {exit_code}: {stderr}")]
    ConversionFailed { exit_code: i32, stderr: String },

    #[error("CANCELLED: operation was cancelled")]
    Cancelled,

    #[error("SPAWN_FAILED: could not launch '{}': {source}", path.display())]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Lock errors
    #[error("LOCK_ERROR: {0}")]
    Lock(LockError),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

impl SvgDxfError {
    /// Stable machine-readable code, identical to the message prefix.
    pub fn code(&self) -> &'static str {
        match self {
            SvgDxfError::UnsupportedPlatform { .. } => "UNSUPPORTED_PLATFORM",
            SvgDxfError::ExecutableNotFound { .. } => "EXECUTABLE_NOT_FOUND",
            SvgDxfError::InvalidArgument(_) => "INVALID_ARGUMENT",
            SvgDxfError::ConversionFailed { .. } => "CONVERSION_FAILED",
            SvgDxfError::Cancelled => "CANCELLED",
            SvgDxfError::SpawnFailed { .. } => "SPAWN_FAILED",
            SvgDxfError::Lock(_) => "LOCK_ERROR",
            SvgDxfError::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            SvgDxfError::ConfigInvalidValue { .. } => "CONFIG_INVALID_VALUE",
            SvgDxfError::IoError(_) => "IO_ERROR",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SvgDxfError::Cancelled)
    }
}

// Cancellation observed while waiting on a lock is surfaced as-is, not as a lock failure.
impl From<LockError> for SvgDxfError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Cancelled { .. } => SvgDxfError::Cancelled,
            other => SvgDxfError::Lock(other),
        }
    }
}

impl From<toml::de::Error> for SvgDxfError {
    fn from(err: toml::de::Error) -> Self {
        SvgDxfError::ConfigParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SvgDxfError>;
