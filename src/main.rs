//! DogeTrade command line: backtests and live signals for Binance futures.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use dogetrade_config::LogFormat;
use dogetrade_monitor::setup_logging;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli::load_app_config(cli.config.as_deref())?;

    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json_logs = cli.json_logs || config.logging.format == LogFormat::Json;
    setup_logging(&log_level, json_logs).context("Failed to initialise logging")?;
    debug!(app = %config.app.name, environment = %config.app.environment, "Configuration loaded");

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config).await,
        Commands::Signal(args) => cli::commands::signal::run(args, &config).await,
        Commands::Sweep(args) => cli::commands::sweep::run(args, &config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig(args) => cli::commands::validate::run(args, &config).await,
    }
}
