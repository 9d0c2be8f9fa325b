//! Platform command - report the detected platform and executable

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use svgdxf_outlines::PlatformIdentifier;

#[derive(Debug, Serialize)]
struct PlatformReport {
    platform: PlatformIdentifier,
    suffix: String,
    executable_name: String,
    lock_path: String,
    resolved_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute `svgdxf platform`
///
/// Exits 0 even when the executable is missing; the report says why.
pub fn run(ctx: Context, json: bool) -> Result<()> {
    let platform = PlatformIdentifier::current()?;
    let resolved = ctx.converter.executable_path();

    let report = PlatformReport {
        platform,
        suffix: platform.suffix(),
        executable_name: platform.executable_name(&ctx.config.tool.base_name),
        lock_path: ctx.config.lock_path().display().to_string(),
        resolved_path: resolved
            .as_ref()
            .ok()
            .map(|p| p.display().to_string()),
        error: resolved.as_ref().err().map(|e| e.to_string()),
    };

    if json {
        print_json(&serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    print_text("dxf_outlines Platform")?;
    print_text("=====================")?;
    print_text(&format!("Platform:   {}", report.suffix))?;
    print_text(&format!("Executable: {}", report.executable_name))?;
    print_text(&format!("Lock file:  {}", report.lock_path))?;
    match (&report.resolved_path, &report.error) {
        (Some(path), _) => print_text(&format!("Resolved:   {} {}", path, "✓".green()))?,
        (None, Some(err)) => print_text(&format!("Resolved:   {}", err.red()))?,
        (None, None) => {}
    }
    Ok(())
}
