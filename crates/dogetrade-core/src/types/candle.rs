//! OHLCV candle and series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Interval;
use crate::error::DataError;

/// One OHLCV observation for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time as Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume in base asset units
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Check if the candle closed above its open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Open time as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Every field must be finite and every price strictly positive.
    fn check_values(&self) -> Result<(), DataError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        let volume = [("volume", self.volume)];
        if let Some((field, _)) = prices.iter().chain(&volume).find(|(_, v)| !v.is_finite()) {
            return Err(DataError::NonFiniteValue {
                timestamp: self.timestamp,
                field: *field,
            });
        }
        if let Some((field, value)) = prices.iter().find(|(_, v)| *v <= 0.0) {
            return Err(DataError::NonPositivePrice {
                timestamp: self.timestamp,
                field: *field,
                value: *value,
            });
        }
        Ok(())
    }
}

/// Column of a candle used as indicator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
    Typical,
}

impl PriceSource {
    /// Read this column from a candle.
    #[inline]
    pub fn extract(&self, candle: &Candle) -> f64 {
        match self {
            PriceSource::Open => candle.open,
            PriceSource::High => candle.high,
            PriceSource::Low => candle.low,
            PriceSource::Close => candle.close,
            PriceSource::Volume => candle.volume,
            PriceSource::Typical => candle.typical_price(),
        }
    }

    /// Read this column from every candle.
    pub fn extract_all(&self, candles: &[Candle]) -> Vec<f64> {
        candles.iter().map(|c| self.extract(c)).collect()
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceSource::Open => "open",
            PriceSource::High => "high",
            PriceSource::Low => "low",
            PriceSource::Close => "close",
            PriceSource::Volume => "volume",
            PriceSource::Typical => "typical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PriceSource::Open),
            "high" => Ok(PriceSource::High),
            "low" => Ok(PriceSource::Low),
            "close" => Ok(PriceSource::Close),
            "volume" => Ok(PriceSource::Volume),
            "typical" | "hlc3" => Ok(PriceSource::Typical),
            _ => Err(format!("Invalid price source: {}", s)),
        }
    }
}

/// Time-ordered candle series for one trading pair.
///
/// Timestamps are strictly increasing and every field is finite; both are
/// checked on construction and on every push. Gaps are not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Trading pair, e.g. `DOGEUSDT`
    pub symbol: String,
    /// Candle interval
    pub interval: Interval,
    candles: Vec<Candle>,
    /// Maximum number of candles kept (0 = unlimited)
    capacity: usize,
}

impl Series {
    /// Build a series from candles, validating ordering and values.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        candles: Vec<Candle>,
    ) -> Result<Self, DataError> {
        validate_candles(&candles)?;
        Ok(Self {
            symbol: symbol.into(),
            interval,
            candles,
            capacity: 0,
        })
    }

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            candles: Vec::new(),
            capacity: 0,
        }
    }

    /// Create an empty series that keeps at most `capacity` candles.
    /// When capacity is reached, the oldest candle is dropped on push.
    pub fn with_capacity(symbol: impl Into<String>, interval: Interval, capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            candles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a closed candle.
    pub fn push(&mut self, candle: Candle) -> Result<(), DataError> {
        candle.check_values()?;
        if let Some(last) = self.candles.last() {
            if candle.timestamp <= last.timestamp {
                return Err(DataError::NonMonotonicTimestamp {
                    previous: last.timestamp,
                    next: candle.timestamp,
                });
            }
        }
        if self.capacity > 0 && self.candles.len() >= self.capacity {
            self.candles.remove(0);
        }
        self.candles.push(candle);
        Ok(())
    }

    /// Number of candles.
    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// All candles, oldest first.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// The first `len` candles (clamped to the series length).
    pub fn prefix(&self, len: usize) -> &[Candle] {
        &self.candles[..len.min(self.candles.len())]
    }

    /// Get a candle by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// The most recent candle.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Keep only the most recent `n` candles.
    pub fn truncate_front(&mut self, n: usize) {
        let excess = self.candles.len().saturating_sub(n);
        self.candles.drain(..excess);
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<f64> {
        PriceSource::Close.extract_all(&self.candles)
    }

    /// Extract any column.
    pub fn values(&self, source: PriceSource) -> Vec<f64> {
        source.extract_all(&self.candles)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }
}

/// Check the series invariants on a candle slice.
pub fn validate_candles(candles: &[Candle]) -> Result<(), DataError> {
    for candle in candles {
        candle.check_values()?;
    }
    for pair in candles.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(DataError::NonMonotonicTimestamp {
                previous: pair[0].timestamp,
                next: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: i64, close: f64) -> Candle {
        Candle::new(ts, close, close + 1.0, close * 0.5, close, 1000.0)
    }

    #[test]
    fn test_candle_calculations() {
        let c = Candle::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((c.typical_price() - 103.333333).abs() < 0.001);
        assert!(c.is_bullish());
        assert_eq!(c.datetime().timestamp_millis(), 1000);
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let err = Series::new(
            "DOGEUSDT",
            Interval::Minute1,
            vec![candle(2, 1.0), candle(1, 1.0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::NonMonotonicTimestamp { previous: 2, next: 1 }
        ));

        let err = Series::new(
            "DOGEUSDT",
            Interval::Minute1,
            vec![candle(1, 1.0), candle(1, 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::NonMonotonicTimestamp { .. }));
    }

    #[test]
    fn test_series_rejects_nan() {
        let err = Series::new("DOGEUSDT", Interval::Minute1, vec![candle(1, f64::NAN)])
            .unwrap_err();
        assert!(matches!(err, DataError::NonFiniteValue { field: "open", .. }));
    }

    #[test]
    fn test_series_rejects_non_positive_prices() {
        let err = Series::new(
            "DOGEUSDT",
            Interval::Minute1,
            vec![candle(1, 1.0), candle(2, 0.0), candle(3, 2.0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::NonPositivePrice { timestamp: 2, field: "open", .. }
        ));

        let below_zero = Candle::new(4, 1.0, 1.0, 1.0, -0.5, 1.0);
        let mut series = Series::with_capacity("DOGEUSDT", Interval::Minute1, 3);
        assert!(matches!(
            series.push(below_zero),
            Err(DataError::NonPositivePrice { field: "close", .. })
        ));
        assert!(series.is_empty());

        // zero volume is a quiet bar, not bad data
        assert!(series.push(Candle::new(5, 1.0, 1.0, 1.0, 1.0, 0.0)).is_ok());
    }

    #[test]
    fn test_series_push_and_capacity() {
        let mut series = Series::with_capacity("DOGEUSDT", Interval::Minute1, 3);

        series.push(candle(1, 0.10)).unwrap();
        series.push(candle(2, 0.11)).unwrap();
        series.push(candle(3, 0.12)).unwrap();
        assert_eq!(series.len(), 3);

        series.push(candle(4, 0.13)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().timestamp, 2);

        assert!(series.push(candle(4, 0.14)).is_err());
        assert_eq!(series.last().unwrap().close, 0.13);
    }

    #[test]
    fn test_series_extractions() {
        let series = Series::new(
            "DOGEUSDT",
            Interval::Minute15,
            vec![candle(1, 100.5), candle(2, 101.5)],
        )
        .unwrap();

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.values(PriceSource::High), vec![101.5, 102.5]);
        assert_eq!(series.prefix(1).len(), 1);
        assert_eq!(series.prefix(10).len(), 2);
    }

    #[test]
    fn test_truncate_front() {
        let mut series = Series::new(
            "DOGEUSDT",
            Interval::Hour1,
            (1..=5).map(|i| candle(i, i as f64)).collect(),
        )
        .unwrap();
        series.truncate_front(2);
        assert_eq!(series.closes(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_price_source_parse() {
        assert_eq!("close".parse::<PriceSource>().unwrap(), PriceSource::Close);
        assert_eq!("HLC3".parse::<PriceSource>().unwrap(), PriceSource::Typical);
        assert!("vwap".parse::<PriceSource>().is_err());
        assert_eq!(PriceSource::default(), PriceSource::Close);
    }
}
