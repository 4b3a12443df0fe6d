//! Error types for the signal engine.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Backtest error: {0}")]
    Backtest(#[from] BacktestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator parameter and frame errors.
///
/// Insufficient data is deliberately absent: short input yields
/// "not available" values instead of an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Column '{name}' has {actual} values, frame expects {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Strategy configuration and lookup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown strategy: {0} (expected EMA, RSI or MACD)")]
    NotFound(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Timestamps must be strictly increasing: {previous} followed by {next}")]
    NonMonotonicTimestamp { previous: i64, next: i64 },

    #[error("Candle at {timestamp} has a non-finite {field}")]
    NonFiniteValue { timestamp: i64, field: &'static str },

    #[error("Candle at {timestamp} has a non-positive {field}: {value}")]
    NonPositivePrice {
        timestamp: i64,
        field: &'static str,
        value: f64,
    },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Backtest run errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Cannot backtest an empty series")]
    EmptySeries,

    #[error("Invalid backtest configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for engine operations.
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: TradingError = BacktestError::EmptySeries.into();
        assert!(matches!(err, TradingError::Backtest(BacktestError::EmptySeries)));
        assert_eq!(
            err.to_string(),
            "Backtest error: Cannot backtest an empty series"
        );
    }

    #[test]
    fn test_strategy_error_wraps_indicator_error() {
        let err: StrategyError = IndicatorError::InvalidParameter("period".into()).into();
        assert_eq!(err.to_string(), "Invalid parameter: period");
    }
}
