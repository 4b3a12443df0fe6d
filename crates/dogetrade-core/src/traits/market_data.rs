//! Market data source trait.

use crate::error::DataError;
use crate::types::{Interval, Series};
use async_trait::async_trait;

/// Supplier of historical candle series.
///
/// Implementations are explicit collaborators owned by whoever assembles
/// the engine (CLI command, live monitor); the engine itself never
/// fetches data.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the most recent `limit` closed candles.
    ///
    /// # Returns
    /// A validated series ordered from oldest to newest
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
