//! Core traits for the signal engine.

mod indicator;
mod market_data;
mod strategy;

pub use indicator::{Indicator, StreamingIndicator};
pub use market_data::MarketDataSource;
pub use strategy::{Strategy, StrategyConfig};
