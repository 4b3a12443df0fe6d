//! EMA Crossover Strategy.
//!
//! Generates buy signals when the fast EMA crosses above the slow EMA,
//! and sell signals when the fast EMA crosses below the slow EMA.

use dogetrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{Candle, IndicatorFrame, PriceSource, Signal},
};
use dogetrade_indicators::Ema;
use serde::{Deserialize, Serialize};

use crate::crossover::column_cross;

/// Configuration for the EMA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaCrossoverConfig {
    /// Fast EMA span
    pub fast_period: usize,
    /// Slow EMA span
    pub slow_period: usize,
}

impl Default for EmaCrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 9,
            slow_period: 21,
        }
    }
}

impl StrategyConfig for EmaCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be greater than 0".into(),
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

/// EMA Crossover Strategy.
#[derive(Debug, Clone)]
pub struct EmaCrossoverStrategy {
    config: EmaCrossoverConfig,
    fast: Ema,
    slow: Ema,
    name: String,
}

impl EmaCrossoverStrategy {
    /// Create a new EMA Crossover strategy from a validated config.
    pub fn new(config: EmaCrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            fast: Ema::new(config.fast_period)?,
            slow: Ema::new(config.slow_period)?,
            name: format!("EMA Crossover ({}/{})", config.fast_period, config.slow_period),
            config,
        })
    }

    pub fn config(&self) -> &EmaCrossoverConfig {
        &self.config
    }

    fn lines(&self, candles: &[Candle]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        (
            self.fast.compute(candles, PriceSource::Close),
            self.slow.compute(candles, PriceSource::Close),
        )
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Buys when the fast EMA crosses above the slow EMA, sells on the opposite cross"
    }

    /// Both EMAs are defined from the first bar, so two bars suffice.
    fn warmup_period(&self) -> usize {
        2
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        if !self.is_warmed_up(candles.len()) {
            return Signal::Hold;
        }
        let (fast, slow) = self.lines(candles);
        column_cross(&fast, &slow, candles.len() - 1)
    }

    fn signal_series(&self, candles: &[Candle]) -> Vec<Signal> {
        let (fast, slow) = self.lines(candles);
        (0..candles.len())
            .map(|i| {
                if self.is_warmed_up(i + 1) {
                    column_cross(&fast, &slow, i)
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn indicators(&self, candles: &[Candle]) -> IndicatorFrame {
        let (fast, slow) = self.lines(candles);
        let mut frame = IndicatorFrame::new(candles.len());
        // Columns are computed from `candles`, so lengths always match.
        let _ = frame.insert(self.fast.name(), fast);
        let _ = frame.insert(self.slow.name(), slow);
        frame
    }
}
