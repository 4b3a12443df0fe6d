//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{Candle, IndicatorFrame, Signal};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy trait.
///
/// A strategy reduces a price-series prefix to exactly one signal for the
/// most recent bar. Strategies are stateless: any notion of an open
/// position belongs to the caller (backtest engine or live monitor), so the
/// same instance can be shared across threads and runs.
pub trait Strategy: Send + Sync {
    /// Get the display name of this strategy.
    fn name(&self) -> &str;

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }

    /// Number of bars needed before the strategy can emit anything but HOLD.
    fn warmup_period(&self) -> usize;

    /// Evaluate the signal for the last candle of `candles`.
    ///
    /// Returns [`Signal::Hold`] when fewer than [`warmup_period`] candles
    /// are available.
    ///
    /// [`warmup_period`]: Strategy::warmup_period
    fn evaluate(&self, candles: &[Candle]) -> Signal;

    /// One signal per bar, where element `i` equals
    /// `evaluate(&candles[..=i])`.
    ///
    /// The default replays every prefix. Implementations may override this
    /// with a single pass as long as the result is identical.
    fn signal_series(&self, candles: &[Candle]) -> Vec<Signal> {
        (1..=candles.len())
            .map(|n| self.evaluate(&candles[..n]))
            .collect()
    }

    /// Indicator columns the strategy looks at, aligned with `candles`.
    fn indicators(&self, candles: &[Candle]) -> IndicatorFrame;

    /// Check if the strategy is warmed up (has enough data).
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }
}
