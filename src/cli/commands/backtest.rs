//! Backtest command implementation.

use anyhow::{Context, Result};
use dogetrade_backtest::BacktestEngine;
use dogetrade_config::AppConfig;
use tracing::info;

use super::{load_series, open_source, validate};
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    let mut config = config.clone();
    config.market = args.market.resolve(&config.market);
    config.strategy = args.strategy.resolve(&config.strategy)?;
    if let Some(capital) = args.capital {
        config.backtest.initial_capital = capital;
    }
    if let Some(replay) = args.replay {
        config.backtest.replay = replay.into();
    }
    validate(&config)?;

    info!(strategy = %config.strategy, symbol = %config.market.symbol, "Starting backtest");

    let source = open_source(&config.market, args.market.csv.as_deref())?;
    let series = load_series(source.as_ref(), &config.market).await?;

    let strategy = config
        .strategy
        .build()
        .context("Failed to create strategy")?;
    let engine = BacktestEngine::new(config.backtest.to_engine_config());
    let run = engine
        .run(strategy.as_ref(), &series)
        .context("Backtest failed")?;

    match args.output {
        OutputFormat::Text => {
            println!("Interval: {}", series.interval);
            println!("{}", run.summary());
        }
        OutputFormat::Json => println!("{}", run.to_json()?),
        OutputFormat::Csv => print!("{}", run.trades_to_csv()),
    }

    if let Some(path) = &args.save {
        std::fs::write(path, run.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Results saved to {}", path.display());
    }
    if let Some(path) = &args.equity_csv {
        std::fs::write(path, run.equity_to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Equity curve saved to {}", path.display());
    }

    Ok(())
}
