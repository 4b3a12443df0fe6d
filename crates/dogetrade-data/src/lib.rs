//! Market data sources.
//!
//! Both sources implement [`MarketDataSource`] and return validated
//! [`Series`] ordered from oldest to newest.

mod binance;
mod csv_source;

pub use binance::{parse_klines, BinanceFuturesClient, Kline, DEFAULT_BASE_URL, MAX_KLINES_PER_REQUEST};
pub use csv_source::CsvDataSource;

use dogetrade_core::error::DataError;
use dogetrade_core::traits::MarketDataSource;
use dogetrade_core::types::{Interval, Series};
use std::path::Path;

/// Load a whole CSV file as one series.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    interval: Interval,
) -> Result<Series, DataError> {
    let source = CsvDataSource::new(path)?;
    source.fetch_series(symbol, interval, usize::MAX).await
}
