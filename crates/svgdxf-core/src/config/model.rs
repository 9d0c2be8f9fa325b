use super::consts;
use crate::error::{Result, SvgDxfError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// svgdxf.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub warmup: WarmupConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub options: ConversionOptions,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SvgDxfError::ConfigParseError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tool.base_name.trim().is_empty() {
            return Err(invalid("tool.base_name", "must not be empty"));
        }
        if self.warmup.retry_delay_ms == 0 {
            return Err(invalid("warmup.retry_delay_ms", "must be greater than 0"));
        }
        if self.diagnostics.max_stderr_bytes == 0 {
            return Err(invalid(
                "diagnostics.max_stderr_bytes",
                "must be greater than 0",
            ));
        }
        self.options
            .validate()
            .map_err(|reason| invalid("options.encoding", &reason))
    }

    /// Lock file path: configured value, else `<temp>/<base_name>.warmup.lock`
    pub fn lock_path(&self) -> PathBuf {
        self.tool.lock_path.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!(
                "{}{}",
                self.tool.base_name,
                consts::warmup::LOCK_FILE_SUFFIX
            ))
        })
    }
}

fn invalid(field: &str, reason: &str) -> SvgDxfError {
    SvgDxfError::ConfigInvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_base_name")]
    pub base_name: String,
    /// Directory holding the platform executables (default: install dir)
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Explicit executable, bypassing platform resolution
    #[serde(default)]
    pub executable: Option<PathBuf>,
    #[serde(default)]
    pub lock_path: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            base_name: default_base_name(),
            base_dir: None,
            executable: None,
            lock_path: None,
        }
    }
}

fn default_base_name() -> String {
    consts::tool::DEFAULT_BASE_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmupConfig {
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Unset means wait for the lock until cancelled
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl WarmupConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
            timeout_ms: None,
        }
    }
}

fn default_retry_delay_ms() -> u64 {
    consts::warmup::RETRY_DELAY_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_max_stderr_bytes")]
    pub max_stderr_bytes: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_stderr_bytes: default_max_stderr_bytes(),
        }
    }
}

fn default_max_stderr_bytes() -> usize {
    consts::diagnostics::MAX_STDERR_BYTES
}

/// Drawing units understood by dxf_outlines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Px,
    In,
    Ft,
    Mm,
    Cm,
    M,
}

impl Units {
    pub const ALL: [Units; 6] = [
        Units::Px,
        Units::In,
        Units::Ft,
        Units::Mm,
        Units::Cm,
        Units::M,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Px => "px",
            Units::In => "in",
            Units::Ft => "ft",
            Units::Mm => "mm",
            Units::Cm => "cm",
            Units::M => "m",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = SvgDxfError;

    fn from_str(s: &str) -> Result<Self> {
        Units::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| {
                SvgDxfError::InvalidArgument(format!(
                    "unknown units '{}' (expected one of px, in, ft, mm, cm, m)",
                    s
                ))
            })
    }
}

/// Options forwarded to dxf_outlines for a single conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub use_polyline: bool,
    pub flatten_beziers: bool,
    pub robo_master: bool,
    /// Ignored by the tool while `unit_from_document` is true
    pub units: Units,
    pub unit_from_document: bool,
    pub encoding: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            use_polyline: false,
            flatten_beziers: false,
            robo_master: false,
            units: Units::default(),
            unit_from_document: true,
            encoding: "latin_1".to_string(),
        }
    }
}

impl ConversionOptions {
    pub fn with_polyline(mut self, use_polyline: bool) -> Self {
        self.use_polyline = use_polyline;
        self
    }

    pub fn with_flatten_beziers(mut self, flatten_beziers: bool) -> Self {
        self.flatten_beziers = flatten_beziers;
        self
    }

    pub fn with_robo_master(mut self, robo_master: bool) -> Self {
        self.robo_master = robo_master;
        self
    }

    /// Use fixed units instead of the ones declared by the document
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self.unit_from_document = false;
        self
    }

    pub fn with_unit_from_document(mut self, unit_from_document: bool) -> Self {
        self.unit_from_document = unit_from_document;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Checks the encoding is a single non-empty token
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.encoding.is_empty() {
            return Err("encoding must not be empty".to_string());
        }
        if self.encoding.chars().any(char::is_whitespace) {
            return Err(format!("encoding '{}' contains whitespace", self.encoding));
        }
        Ok(())
    }
}
