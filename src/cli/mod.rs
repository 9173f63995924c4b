//! CLI definitions for taskflow.
//!
//! Flags here override values from the configuration files and environment.

use crate::config::Config;
use crate::logging::LogTarget;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// Task tracker: JSON HTTP API over SQLite plus a static browser client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (overrides config, default: 2009)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the browser client (overrides config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,
}

impl Cli {
    pub fn log_target(&self) -> LogTarget {
        LogTarget::parse(&self.log)
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db_path) = &self.database {
            config.server.db_path = db_path.clone();
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(static_dir) = &self.static_dir {
            config.server.static_dir = static_dir.clone();
        }
    }
}
