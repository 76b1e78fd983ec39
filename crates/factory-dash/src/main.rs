//! Main entry point for Factory Dash.

use anyhow::Context;
use clap::Parser;
use factory_common::{init_logging, LoggingConfig};
use factory_config::ConfigLoader;
use factory_dash::{App, Cli};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }

    init_logging(LoggingConfig::from(&config.logging)).context("Failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Factory Dash");

    let app = App::new(config);
    if let Err(e) = app.run(cli.command).await {
        error!("Command failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
