//! Orchestration of the prebuilt `dxf_outlines` SVG → DXF converter.
//!
//! All geometry work happens in the external executable. This crate finds
//! the right build for the running platform, makes sure its one-time
//! self-extraction has happened, and pipes documents through it.
//!
//! # Architecture
//!
//! - [`platform`]: OS / architecture / libc detection and executable naming
//! - [`resolve`]: executable lookup relative to the install directory
//! - [`args`]: conversion options → ordered command-line arguments
//! - [`warmup`]: once-per-process, cross-process-serialized warmup
//! - [`convert`]: subprocess invocation with piped stdio and cancellation
//!
//! # Conversion Flow
//!
//! ```text
//! Converter::convert(svg, options, token)
//!     ↓
//! 1. Validate input and options
//!     ↓
//! 2. Resolve {install_dir}/dxf_outlines-{platform}
//!     ↓
//! 3. WarmupCoordinator::ensure_warmed_up (first call only)
//!     ↓
//! 4. Spawn with encoded args, SVG on stdin
//!     ↓
//! 5. exit 0 → stdout bytes, otherwise ConversionFailed
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use svgdxf_outlines::{Converter, ConversionOptions, Units};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> svgdxf_outlines::Result<()> {
//! let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="10" height="5"/></svg>"#;
//! let options = ConversionOptions::default().with_units(Units::Mm);
//!
//! let dxf = Converter::new()
//!     .convert(svg, &options, &CancellationToken::new())
//!     .await?;
//! std::fs::write("out.dxf", dxf)?;
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod convert;
pub mod platform;
pub mod resolve;
pub mod sink;
pub mod warmup;

pub use convert::{Converter, InvocationResult, convert};
pub use platform::PlatformIdentifier;
pub use resolve::{ExecutableSource, resolve_executable_path};
pub use sink::{StderrSink, TracingSink};
pub use svgdxf_core::{ConversionOptions, SvgDxfError, Units};
pub use warmup::WarmupCoordinator;

pub type Result<T> = svgdxf_core::Result<T>;
