//! Technical indicators over candle series.
//!
//! This crate provides the indicators the strategies are built from:
//! - Moving averages (SMA, EMA, streaming EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Bollinger Bands, Standard Deviation)
//!
//! Every output is aligned 1:1 with its input. Positions that are not
//! available yet hold `None`.

pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use momentum::{macd, rsi, Macd, MacdSeries, Rsi};
pub use moving_average::{ema, sma, Ema, Sma, StreamingEma};
pub use volatility::{bollinger_bands, std_dev, BollingerBands, BollingerSeries, StdDev};
