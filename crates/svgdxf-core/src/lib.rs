// Core modules
pub mod config;
pub mod error;
pub mod lock;

// Re-export commonly used types
pub use config::{Config, ConversionOptions, Units};
pub use error::{Result, SvgDxfError};
