//! CSV data source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use dogetrade_core::error::DataError;
use dogetrade_core::traits::MarketDataSource;
use dogetrade_core::types::{Candle, Interval, Series};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One CSV row. Extra columns (close_time, trades, ...) are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "Timestamp", alias = "open_time")]
    timestamp: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Unix timestamps above this are taken to be milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Parse a timestamp column into Unix milliseconds.
///
/// Accepts Unix seconds or milliseconds and a few calendar formats (UTC).
fn parse_timestamp(raw: &str) -> Result<i64, DataError> {
    let raw = raw.trim();

    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(if ts > MILLIS_THRESHOLD { ts } else { ts * 1000 });
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Some(dt) = NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    Err(DataError::ParseError(format!("Could not parse timestamp: {}", raw)))
}

/// Historical candles from a CSV file with an OHLCV header.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a CSV source. Fails if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row, sorted by timestamp.
    pub fn load_candles(&self) -> Result<Vec<Candle>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut candles = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            candles.push(Candle::new(
                parse_timestamp(&record.timestamp)?,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        candles.sort_by_key(|c| c.timestamp);
        debug!(path = %self.path.display(), rows = candles.len(), "Loaded CSV candles");
        Ok(candles)
    }
}

#[async_trait]
impl MarketDataSource for CsvDataSource {
    /// The file carries no symbol or interval; both are taken as given.
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, DataError> {
        let candles = self.load_candles()?;
        if candles.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        let mut series = Series::new(symbol, interval, candles)?;
        series.truncate_front(limit);
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("2024-01-15 10:00:00").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("2024-01-15T10:00:00").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvDataSource::new("/nonexistent/doge.csv"),
            Err(DataError::NoDataAvailable)
        ));
    }

    #[tokio::test]
    async fn test_fetch_series_sorts_and_limits() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume,close_time\n\
             1700000900000,0.0603,0.061,0.0602,0.0609,980000,1700001799999\n\
             1700000000000,0.0601,0.0605,0.0599,0.0603,1250000,1700000899999\n\
             1700001800000,0.0609,0.0612,0.0600,0.0604,700000,1700002699999\n",
        );
        let source = CsvDataSource::new(file.path()).unwrap();

        let all = source
            .fetch_series("DOGEUSDT", Interval::Minute15, 500)
            .await
            .unwrap();
        assert_eq!(all.closes(), vec![0.0603, 0.0609, 0.0604]);
        assert_eq!(all.interval, Interval::Minute15);

        let tail = source
            .fetch_series("DOGEUSDT", Interval::Minute15, 2)
            .await
            .unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.get(0).unwrap().timestamp, 1_700_000_900_000);
    }

    #[tokio::test]
    async fn test_capitalized_headers_and_dates() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-15,1,2,0.5,1.5,10\n\
             2024-01-16,1.5,2,1,1.8,12\n",
        );
        let series = crate::load_csv(file.path(), "DOGEUSDT", Interval::Daily)
            .await
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 1.8);
    }

    #[tokio::test]
    async fn test_duplicate_timestamps_are_rejected() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             1700000000000,1,1,1,1,1\n\
             1700000000000,1,1,1,1,1\n",
        );
        let source = CsvDataSource::new(file.path()).unwrap();
        let err = source
            .fetch_series("DOGEUSDT", Interval::Minute15, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NonMonotonicTimestamp { .. }));
    }

    #[tokio::test]
    async fn test_empty_and_malformed_files() {
        let empty = write_csv("timestamp,open,high,low,close,volume\n");
        let source = CsvDataSource::new(empty.path()).unwrap();
        assert!(matches!(
            source.fetch_series("DOGEUSDT", Interval::Minute15, 10).await,
            Err(DataError::NoDataAvailable)
        ));

        let bad = write_csv("timestamp,open,high,low,close,volume\n1700000000000,x,1,1,1,1\n");
        let source = CsvDataSource::new(bad.path()).unwrap();
        assert!(matches!(
            source.fetch_series("DOGEUSDT", Interval::Minute15, 10).await,
            Err(DataError::ParseError(_))
        ));
    }
}
