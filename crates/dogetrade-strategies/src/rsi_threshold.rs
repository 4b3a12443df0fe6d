//! RSI Threshold Strategy.
//!
//! Buys when RSI drops into the oversold zone and sells when RSI rises
//! into the overbought zone. Only the bar where the level is crossed
//! produces a signal.

use dogetrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{Candle, IndicatorFrame, PriceSource, Signal},
};
use dogetrade_indicators::Rsi;
use serde::{Deserialize, Serialize};

use crate::crossover::threshold_cross;

/// Configuration for the RSI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThresholdConfig {
    /// RSI calculation period
    pub period: usize,
    /// Oversold threshold (buy on a cross below)
    pub oversold: f64,
    /// Overbought threshold (sell on a cross above)
    pub overbought: f64,
}

impl Default for RsiThresholdConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl StrategyConfig for RsiThresholdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidConfig(
                "RSI period must be greater than 0".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(StrategyError::InvalidConfig(
                "Oversold must be less than overbought".into(),
            ));
        }
        Ok(())
    }
}

/// RSI Threshold Strategy.
#[derive(Debug, Clone)]
pub struct RsiThresholdStrategy {
    config: RsiThresholdConfig,
    rsi: Rsi,
    name: String,
}

impl RsiThresholdStrategy {
    /// Create a new RSI strategy from a validated config.
    pub fn new(config: RsiThresholdConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            rsi: Rsi::new(config.period)?,
            name: format!(
                "RSI ({}, {}/{})",
                config.period, config.oversold, config.overbought
            ),
            config,
        })
    }

    pub fn config(&self) -> &RsiThresholdConfig {
        &self.config
    }

    fn values(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        self.rsi.compute(candles, PriceSource::Close)
    }

    fn signal_at(&self, rsi: &[Option<f64>], index: usize) -> Signal {
        threshold_cross(rsi, self.config.oversold, self.config.overbought, index)
    }
}

impl Strategy for RsiThresholdStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Buys when RSI crosses below oversold, sells when it crosses above overbought"
    }

    fn warmup_period(&self) -> usize {
        // two defined RSI values
        self.config.period + 2
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        if !self.is_warmed_up(candles.len()) {
            return Signal::Hold;
        }
        self.signal_at(&self.values(candles), candles.len() - 1)
    }

    fn signal_series(&self, candles: &[Candle]) -> Vec<Signal> {
        let rsi = self.values(candles);
        (0..candles.len())
            .map(|i| {
                if self.is_warmed_up(i + 1) {
                    self.signal_at(&rsi, i)
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn indicators(&self, candles: &[Candle]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(candles.len());
        let _ = frame.insert(self.rsi.name(), self.values(candles));
        frame
    }
}
