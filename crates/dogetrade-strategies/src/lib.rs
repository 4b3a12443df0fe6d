//! Crossover signal strategies.
//!
//! This crate provides the three built-in strategies:
//! - EMA Crossover (fast/slow EMA)
//! - RSI Threshold (oversold/overbought crosses)
//! - MACD Crossover (MACD line vs signal line)
//!
//! Strategies are stateless and are selected once at configuration time
//! through [`StrategySpec`].

mod crossover;
mod ema_crossover;
mod macd_crossover;
mod registry;
mod rsi_threshold;
mod spec;

pub use ema_crossover::{EmaCrossoverConfig, EmaCrossoverStrategy};
pub use macd_crossover::{MacdCrossoverConfig, MacdCrossoverStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use rsi_threshold::{RsiThresholdConfig, RsiThresholdStrategy};
pub use spec::{StrategyKind, StrategySpec};
