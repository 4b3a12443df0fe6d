//! Momentum indicators.

use dogetrade_core::error::IndicatorError;
use dogetrade_core::traits::Indicator;
use dogetrade_core::types::{PriceSource, Series};
use serde::{Deserialize, Serialize};

use crate::moving_average::{validate_period, Ema};

/// Relative Strength Index (RSI).
///
/// Uses simple rolling means of the last `period` price changes:
/// `RS = mean(gains) / mean(losses)`, `RSI = 100 − 100 / (1 + RS)`.
/// Positions before `period` are not available.
///
/// When the mean loss over the window is zero, RS is unbounded and RSI
/// saturates at 100. This includes a perfectly flat window.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        validate_period("RSI", period, 1)?;
        Ok(Self {
            period,
            name: format!("rsi_{}", period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = Vec<Option<f64>>;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let period_f64 = self.period as f64;

        // Window sums are recomputed rather than slid so an all-gain
        // window produces an exact zero loss.
        for (offset, window) in changes.windows(self.period).enumerate() {
            let gains: f64 = window.iter().filter(|c| **c > 0.0).sum();
            let losses: f64 = window.iter().filter(|c| **c < 0.0).map(|c| -c).sum();
            result[offset + self.period] =
                Some(Self::from_averages(gains / period_f64, losses / period_f64));
        }

        result
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// MACD output columns, aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<Option<f64>>,
    /// Signal line (EMA of the MACD line)
    pub signal: Vec<Option<f64>>,
    /// Histogram (MACD - signal)
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    fn unavailable(len: usize) -> Self {
        Self {
            macd: vec![None; len],
            signal: vec![None; len],
            histogram: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum. The whole
/// output is unavailable when the input is shorter than the slow period.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    name: String,
}

impl Macd {
    /// Create a MACD with custom periods.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        validate_period("MACD fast", fast, 1)?;
        validate_period("MACD slow", slow, 1)?;
        validate_period("MACD signal", signal, 1)?;
        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
            name: format!("macd_{}_{}_{}", fast, slow, signal),
        })
    }

    pub fn slow_period(&self) -> usize {
        self.slow.period()
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn calculate(&self, data: &[f64]) -> MacdSeries {
        if data.len() < self.slow.period() {
            return MacdSeries::unavailable(data.len());
        }

        let fast = self.fast.values(data);
        let slow = self.slow.values(data);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = self.signal.values(&line);

        MacdSeries {
            histogram: line.iter().zip(&signal).map(|(m, s)| Some(m - s)).collect(),
            macd: line.into_iter().map(Some).collect(),
            signal: signal.into_iter().map(Some).collect(),
        }
    }

    fn warmup_period(&self) -> usize {
        self.slow.period() - 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// RSI of one series column.
pub fn rsi(
    series: &Series,
    period: usize,
    source: PriceSource,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    Ok(Rsi::new(period)?.compute(series.candles(), source))
}

/// MACD of one series column.
pub fn macd(
    series: &Series,
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
) -> Result<MacdSeries, IndicatorError> {
    Ok(Macd::new(fast, slow, signal)?.compute(series.candles(), source))
}
