//! Taskflow server binary.
//!
//! Loads configuration, opens the store, serves the API and client until
//! Ctrl-C, then shuts down gracefully.

use anyhow::{Context, Result};
use clap::Parser;
use taskflow::api;
use taskflow::cli::Cli;
use taskflow::config::ConfigLoader;
use taskflow::db::Database;
use taskflow::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_target(), cli.verbose)?;

    let mut loader = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(path) = loader.config_path() {
        info!("Using config file {}", path.display());
    }
    cli.apply_overrides(loader.config_mut());
    let config = loader.into_config();

    config.ensure_db_dir()?;
    let db_path = &config.server.db_path;
    let db = Database::open(db_path)
        .inspect_err(|e| error!("Failed to open database {}: {:#}", db_path.display(), e))
        .with_context(|| format!("cannot open database {}", db_path.display()))?;
    info!("Database ready at {}", db_path.display());

    let server = api::start_server(db, &config.server).await?;
    info!("Taskflow available at http://{}", server.addr());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    server.shutdown().await;

    Ok(())
}
