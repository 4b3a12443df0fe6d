//! Configuration structures.

use dogetrade_backtest::{BacktestConfig, SignalReplay};
use dogetrade_core::error::{BacktestError, StrategyError};
use dogetrade_core::types::Interval;
use dogetrade_strategies::StrategySpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest candle window a single klines request can return.
const MAX_LIMIT: usize = 1500;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Semantic problems in an otherwise well-formed configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("Invalid symbol '{0}': expected an uppercase pair such as DOGEUSDT")]
    InvalidSymbol(String),

    #[error("Invalid candle limit {0}: must be between 1 and 1500")]
    InvalidLimit(usize),

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("Invalid monitor settings: {0}")]
    InvalidMonitor(String),

    #[error("Invalid strategy: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Invalid backtest settings: {0}")]
    Backtest(#[from] BacktestError),
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub strategy: StrategySpec,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub monitor: MonitorSettings,
}

impl AppConfig {
    /// Check every section; the first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.logging.validate()?;
        self.market.validate()?;
        self.strategy.validate()?;
        self.backtest.to_engine_config().validate()?;
        self.monitor.validate()?;
        Ok(())
    }

    /// Render as TOML, e.g. to show the effective configuration.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "dogetrade".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        let level = self.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigValidationError::InvalidLogLevel(self.level.clone()));
        }
        Ok(())
    }
}

/// Which market to read and how much history to request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    /// Futures pair, e.g. `DOGEUSDT`
    pub symbol: String,
    pub interval: Interval,
    /// Number of candles per request
    pub limit: usize,
    /// REST endpoint of the futures API
    pub base_url: String,
    /// Drop the still-forming last candle
    pub closed_only: bool,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            symbol: "DOGEUSDT".to_string(),
            interval: Interval::Minute15,
            limit: 500,
            base_url: "https://fapi.binance.com".to_string(),
            closed_only: true,
        }
    }
}

impl MarketSettings {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        let valid_symbol = !self.symbol.is_empty()
            && self
                .symbol
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !valid_symbol {
            return Err(ConfigValidationError::InvalidSymbol(self.symbol.clone()));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(ConfigValidationError::InvalidLimit(self.limit));
        }
        Ok(())
    }
}

/// Backtest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_capital: f64,
    pub replay: SignalReplay,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let engine = BacktestConfig::default();
        Self {
            initial_capital: engine.initial_capital,
            replay: engine.replay,
        }
    }
}

impl BacktestSettings {
    pub fn to_engine_config(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            replay: self.replay,
        }
    }
}

/// Live signal monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Number of signal events kept in memory
    pub history_capacity: usize,
    /// Seconds between polls for new candles
    pub poll_interval_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            poll_interval_secs: 60,
        }
    }
}

impl MonitorSettings {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.history_capacity == 0 {
            return Err(ConfigValidationError::InvalidMonitor(
                "history_capacity must be greater than 0".into(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigValidationError::InvalidMonitor(
                "poll_interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
