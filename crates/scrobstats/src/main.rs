//! Scrobstats - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use scrobstats::{App, Args};
use scrobstats_common::init_logging;
use scrobstats_config::ConfigLoader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("Starting scrobstats");

    let app = App::new(config)?;
    match app.run(args.command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e.into())
        }
    }
}
