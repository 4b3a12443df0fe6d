//! Core data types for the signal engine.

mod candle;
mod frame;
mod interval;
mod signal;

pub use candle::{validate_candles, Candle, PriceSource, Series};
pub use frame::IndicatorFrame;
pub use interval::Interval;
pub use signal::{Signal, SignalEvent};
