//! Backtesting engine.
//!
//! Replays a strategy over a candle series with a single all-in position,
//! and reports the resulting balance, trade log and equity curve.

mod engine;
mod report;
mod statistics;
mod sweep;

pub use engine::{BacktestConfig, BacktestEngine, SignalReplay};
pub use report::{BacktestReport, BacktestRun};
pub use statistics::{BacktestStats, EquityPoint, Position, PositionSide, Trade};
pub use sweep::{rank_by_return, sweep, SweepResult};
