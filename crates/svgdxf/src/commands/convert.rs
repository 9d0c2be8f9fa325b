//! Convert command - pipe an SVG document through dxf_outlines

use crate::context::{Context, cancel_on_ctrl_c};
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use svgdxf_core::{ConversionOptions, Units};
use tokio::io::AsyncWriteExt;

/// Option flags given on the command line
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub polyline: bool,
    pub flatten_beziers: bool,
    pub robo: bool,
    pub units: Option<Units>,
    pub encoding: Option<String>,
}

impl ConvertArgs {
    /// Flags can only switch options on; unset values keep the config defaults
    fn apply(&self, base: &ConversionOptions) -> ConversionOptions {
        let mut options = base
            .clone()
            .with_polyline(base.use_polyline || self.polyline)
            .with_flatten_beziers(base.flatten_beziers || self.flatten_beziers)
            .with_robo_master(base.robo_master || self.robo);
        if let Some(units) = self.units {
            options = options.with_units(units);
        }
        if let Some(encoding) = &self.encoding {
            options = options.with_encoding(encoding.clone());
        }
        options
    }
}

/// Execute `svgdxf convert`
pub async fn run(ctx: Context, args: ConvertArgs) -> Result<()> {
    let options = args.apply(&ctx.config.options);
    let token = cancel_on_ctrl_c();

    let dxf = if is_stdio(&args.input) {
        ctx.converter
            .convert_reader(tokio::io::stdin(), &options, &token)
            .await?
    } else {
        let svg = tokio::fs::read(&args.input)
            .await
            .with_context(|| format!("reading {}", args.input.display()))?;
        ctx.converter.convert(&svg, &options, &token).await?
    };

    match args.output.as_deref().filter(|p| !is_stdio(p)) {
        Some(path) => {
            tokio::fs::write(path, &dxf)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {} bytes to {}", dxf.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&dxf).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
