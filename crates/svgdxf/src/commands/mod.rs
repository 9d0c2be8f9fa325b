//! CLI command implementations

pub mod convert;
pub mod platform;
pub mod warmup;
