//! # Furrow
//!
//! Headless runner for the Furrow farming simulation.
//!
//! Without a config file the built-in defaults are used. `--write-config`
//! saves the effective configuration and exits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod timing;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use furrow_gameplay::FarmConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "furrow", version, about = "Runs a headless Furrow farming session")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// In-game days to simulate.
    #[arg(
        long,
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(0..=10_000)
    )]
    days: Option<u32>,
    /// Save the effective configuration to this path and exit.
    #[arg(long = "write-config", value_name = "PATH")]
    write_config: Option<PathBuf>,
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("furrow=info".parse()?))
        .init();

    info!("Furrow starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => FarmConfig::try_load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => FarmConfig::default(),
    };
    config.validate();

    if let Some(path) = &args.write_config {
        config.save_to(path)?;
        return Ok(());
    }

    let mut options = app::RunOptions::default();
    if let Some(days) = args.days {
        options.days = days;
    }

    let summary = app::run(config, options)?;
    println!("{summary}");

    info!("Furrow shutdown complete");
    Ok(())
}
