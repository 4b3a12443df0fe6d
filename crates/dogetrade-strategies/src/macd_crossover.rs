//! MACD Crossover Strategy.
//!
//! Buys when the MACD line crosses above its signal line and sells when it
//! crosses below.

use dogetrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{Candle, IndicatorFrame, PriceSource, Signal},
};
use dogetrade_indicators::{Macd, MacdSeries};
use serde::{Deserialize, Serialize};

use crate::crossover::column_cross;

/// Configuration for the MACD strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdCrossoverConfig {
    /// Fast EMA span
    pub fast_period: usize,
    /// Slow EMA span
    pub slow_period: usize,
    /// Signal line EMA span
    pub signal_period: usize,
}

impl Default for MacdCrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl StrategyConfig for MacdCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.signal_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "MACD periods must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        Ok(())
    }
}

/// MACD Crossover Strategy.
#[derive(Debug, Clone)]
pub struct MacdCrossoverStrategy {
    config: MacdCrossoverConfig,
    macd: Macd,
    name: String,
}

impl MacdCrossoverStrategy {
    /// Create a new MACD strategy from a validated config.
    pub fn new(config: MacdCrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            macd: Macd::new(config.fast_period, config.slow_period, config.signal_period)?,
            name: format!(
                "MACD ({}/{}/{})",
                config.fast_period, config.slow_period, config.signal_period
            ),
            config,
        })
    }

    pub fn config(&self) -> &MacdCrossoverConfig {
        &self.config
    }

    fn lines(&self, candles: &[Candle]) -> MacdSeries {
        self.macd.compute(candles, PriceSource::Close)
    }
}

impl Strategy for MacdCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Buys when the MACD line crosses above its signal line, sells on the opposite cross"
    }

    /// The MACD columns are filled from the first bar once `slow` bars
    /// exist; a cross still needs two of them.
    fn warmup_period(&self) -> usize {
        self.config.slow_period.max(2)
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        if !self.is_warmed_up(candles.len()) {
            return Signal::Hold;
        }
        let lines = self.lines(candles);
        column_cross(&lines.macd, &lines.signal, candles.len() - 1)
    }

    fn signal_series(&self, candles: &[Candle]) -> Vec<Signal> {
        let lines = self.lines(candles);
        (0..candles.len())
            .map(|i| {
                if self.is_warmed_up(i + 1) {
                    column_cross(&lines.macd, &lines.signal, i)
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn indicators(&self, candles: &[Candle]) -> IndicatorFrame {
        let lines = self.lines(candles);
        let mut frame = IndicatorFrame::new(candles.len());
        let _ = frame.insert("macd", lines.macd);
        let _ = frame.insert("macd_signal", lines.signal);
        let _ = frame.insert("macd_histogram", lines.histogram);
        frame
    }
}
