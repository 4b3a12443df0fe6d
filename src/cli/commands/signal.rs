//! Signal command: evaluate the latest closed candle, optionally keep watching.

use anyhow::{Context, Result};
use dogetrade_config::AppConfig;
use dogetrade_core::types::SignalEvent;
use dogetrade_monitor::SignalMonitor;
use std::time::Duration;
use tracing::{info, warn};

use super::{load_series, open_source, validate};
use crate::cli::SignalArgs;

/// Candles requested per poll; enough to bridge a few missed intervals.
const POLL_LIMIT: usize = 10;

fn print_event(event: &SignalEvent) {
    println!(
        "{}  {:<4}  {:.5}",
        event.datetime().format("%Y-%m-%d %H:%M:%S"),
        event.signal.as_str(),
        event.price
    );
}

pub async fn run(args: SignalArgs, config: &AppConfig) -> Result<()> {
    let mut config = config.clone();
    config.market = args.market.resolve(&config.market);
    config.strategy = args.strategy.resolve(&config.strategy)?;
    if let Some(secs) = args.poll_secs {
        config.monitor.poll_interval_secs = secs;
    }
    if args.watch {
        // The forming candle must never be treated as closed.
        config.market.closed_only = true;
    }
    validate(&config)?;

    let source = open_source(&config.market, args.market.csv.as_deref())?;
    let series = load_series(source.as_ref(), &config.market).await?;
    let strategy = config
        .strategy
        .build()
        .context("Failed to create strategy")?;

    let frame = strategy.indicators(series.candles());
    let mut monitor = SignalMonitor::new(
        strategy,
        &series,
        config.market.limit,
        config.monitor.history_capacity,
    )?;

    println!(
        "{} {} | {}",
        config.market.symbol,
        config.market.interval,
        monitor.strategy_name()
    );
    for name in frame.names() {
        match frame.latest(name) {
            Some(value) => println!("  {:<16} {:.6}", name, value),
            None => println!("  {:<16} n/a", name),
        }
    }
    if let Some(event) = monitor.current_signal() {
        print_event(&event);
    }

    if !args.watch {
        return Ok(());
    }

    let period = Duration::from_secs(config.monitor.poll_interval_secs);
    info!(every_secs = period.as_secs(), "Watching for closed candles (Ctrl+C to stop)");
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately; the snapshot above covers it.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match monitor.poll(source.as_ref(), POLL_LIMIT).await {
                    Ok(events) => events.iter().for_each(print_event),
                    Err(e) => warn!(error = %e, "Poll failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    let (buy, sell, hold) = monitor.history().counts();
    info!(buy, sell, hold, "Signal history");
    Ok(())
}
