//! Constants shared across the workspace

/// Naming and invocation of the external converter
pub mod tool {
    /// Base name of the platform-specific executables
    pub const DEFAULT_BASE_NAME: &str = "dxf_outlines";

    /// Argument used to trigger the one-time self-extraction
    pub const WARMUP_ARG: &str = "--help";

    /// Environment variable overriding the executable path
    pub const EXECUTABLE_ENV: &str = "SVGDXF_EXECUTABLE";
}

/// Warmup lock behaviour
pub mod warmup {
    /// Delay between lock acquisition attempts (ms)
    pub const RETRY_DELAY_MS: u64 = 100;

    /// Suffix appended to the base name to form the lock file name
    pub const LOCK_FILE_SUFFIX: &str = ".warmup.lock";
}

/// Limits on captured diagnostics
pub mod diagnostics {
    /// Maximum stderr text retained per invocation (bytes)
    /// 1MB
    pub const MAX_STDERR_BYTES: usize = 1024 * 1024;
}

/// Name of the optional configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "svgdxf.toml";
