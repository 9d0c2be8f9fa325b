//! Global context for CLI commands

use crate::cli::Cli;
use anyhow::{Context as _, Result};
use std::env;
use svgdxf_core::config::consts::CONFIG_FILE_NAME;
use svgdxf_core::Config;
use svgdxf_outlines::Converter;
use tokio_util::sync::CancellationToken;

/// Effective configuration and the converter built from it
pub struct Context {
    pub config: Config,
    pub converter: Converter,
}

impl Context {
    /// Loads configuration with precedence: flags > env > config file > defaults.
    ///
    /// `--base-dir` replaces an `executable` from the config file; an
    /// executable from `--executable` or `SVGDXF_EXECUTABLE` wins over any base dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or validated.
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => {
                let default_path = env::current_dir()?.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Config::load(&default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(dir) = &cli.base_dir {
            config.tool.base_dir = Some(dir.clone());
            config.tool.executable = None;
        }
        if let Some(exe) = &cli.executable {
            config.tool.executable = Some(exe.clone());
        }

        tracing::debug!("effective config: {:?}", config);
        let converter = Converter::from_config(&config);
        Ok(Self { config, converter })
    }
}

/// Token cancelled on Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}
