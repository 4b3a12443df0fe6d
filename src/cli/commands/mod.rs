//! CLI command implementations.

pub mod backtest;
pub mod signal;
pub mod strategies;
pub mod sweep;
pub mod validate;

use anyhow::{Context, Result};
use dogetrade_config::{AppConfig, MarketSettings};
use dogetrade_core::traits::MarketDataSource;
use dogetrade_core::types::Series;
use dogetrade_data::{BinanceFuturesClient, CsvDataSource};
use std::path::Path;
use tracing::info;

/// Check the configuration after command-line overrides were applied.
pub(crate) fn validate(config: &AppConfig) -> Result<()> {
    config.validate().context("Invalid configuration")
}

/// Build the market data source: a CSV file when given, Binance otherwise.
pub(crate) fn open_source(
    market: &MarketSettings,
    csv: Option<&Path>,
) -> Result<Box<dyn MarketDataSource>> {
    let source: Box<dyn MarketDataSource> = match csv {
        Some(path) => Box::new(
            CsvDataSource::new(path)
                .with_context(|| format!("CSV file '{}' not found", path.display()))?,
        ),
        None => Box::new(
            BinanceFuturesClient::new()
                .context("Failed to create Binance client")?
                .with_base_url(market.base_url.as_str())
                .with_closed_only(market.closed_only),
        ),
    };
    Ok(source)
}

/// Fetch the configured candle window.
pub(crate) async fn load_series(
    source: &dyn MarketDataSource,
    market: &MarketSettings,
) -> Result<Series> {
    let series = source
        .fetch_series(&market.symbol, market.interval, market.limit)
        .await
        .with_context(|| {
            format!(
                "Failed to load {} {} candles from {}",
                market.symbol,
                market.interval,
                source.name()
            )
        })?;

    info!(
        source = source.name(),
        symbol = %series.symbol,
        interval = %series.interval,
        candles = series.len(),
        "Loaded candles"
    );
    Ok(series)
}
