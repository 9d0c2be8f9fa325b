//! Warmup command - force the one-time self-extraction

use crate::context::{Context, cancel_on_ctrl_c};
use crate::output::print_text;
use anyhow::Result;
use colored::Colorize;

/// Execute `svgdxf warmup`
pub async fn run(ctx: Context) -> Result<()> {
    let token = cancel_on_ctrl_c();
    let executable = ctx.converter.warm_up(&token).await?;

    print_text(&format!(
        "{} {} is ready",
        "✓".green(),
        executable.display()
    ))?;
    Ok(())
}
