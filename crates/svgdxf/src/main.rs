mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use commands::convert::ConvertArgs;
use context::Context;
use svgdxf_core::SvgDxfError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match Context::new(&cli) {
        Ok(ctx) => run(ctx, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(ctx: Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Convert {
            input,
            output,
            polyline,
            flatten_beziers,
            robo,
            units,
            encoding,
        } => {
            let args = ConvertArgs {
                input,
                output,
                polyline,
                flatten_beziers,
                robo,
                units,
                encoding,
            };
            commands::convert::run(ctx, args).await
        }
        Commands::Warmup => commands::warmup::run(ctx).await,
        Commands::Platform { json } => commands::platform::run(ctx, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Failed conversions forward the tool's own exit code; interrupts use 130
fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<SvgDxfError>() {
        Some(SvgDxfError::ConversionFailed { exit_code, .. }) if *exit_code > 0 => *exit_code,
        Some(SvgDxfError::Cancelled) => 130,
        _ => 1,
    }
}
