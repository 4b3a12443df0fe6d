//! Core types and traits for the signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, Series, Interval, PriceSource)
//! - Trading signals and aligned indicator frames
//! - Core traits for indicators, strategies and market data sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    BacktestError, DataError, IndicatorError, StrategyError, TradingError, TradingResult,
};
pub use traits::*;
pub use types::*;
