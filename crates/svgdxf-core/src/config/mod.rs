pub mod consts;
pub mod model;

pub use model::{
    Config, ConversionOptions, DiagnosticsConfig, ToolConfig, Units, WarmupConfig,
};
