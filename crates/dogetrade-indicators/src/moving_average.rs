//! Moving average indicators.

use dogetrade_core::error::IndicatorError;
use dogetrade_core::traits::{Indicator, StreamingIndicator};
use dogetrade_core::types::{PriceSource, Series};

pub(crate) fn validate_period(
    indicator: &str,
    period: usize,
    min: usize,
) -> Result<(), IndicatorError> {
    if period < min {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be at least {}, got {}",
            indicator, min, period
        )));
    }
    Ok(())
}

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the trailing `period` values. The first
/// `period - 1` positions are not available.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        validate_period("SMA", period, 1)?;
        Ok(Self {
            period,
            name: format!("sma_{}", period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    type Output = Vec<Option<f64>>;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result[self.period - 1] = Some(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = Some(sum / period_f64);
        }

        result
    }

    fn warmup_period(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Exponential Moving Average (EMA).
///
/// `ema[0] = x[0]`, then `ema[t] = α·x[t] + (1 − α)·ema[t−1]` with
/// `α = 2 / (period + 1)`. Defined from position 0 onward.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        validate_period("EMA", period, 1)?;
        Ok(Self {
            period,
            name: format!("ema_{}", period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Fresh streaming state with the same parameters.
    pub fn streaming(&self) -> StreamingEma {
        StreamingEma::with_alpha(self.alpha())
    }

    /// Calculate over fully-defined input, returning plain values.
    pub(crate) fn values(&self, data: &[f64]) -> Vec<f64> {
        let mut state = self.streaming();
        data.iter().map(|&v| state.advance(v)).collect()
    }
}

impl Indicator for Ema {
    type Output = Vec<Option<f64>>;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut state = self.streaming();
        data.iter().map(|&v| state.update(v)).collect()
    }

    fn warmup_period(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Streaming EMA that maintains state for incremental updates.
///
/// Feeding a series value by value yields exactly the batch [`Ema`]
/// output; the batch form is implemented on top of this type.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    alpha: f64,
    current: Option<f64>,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Ema::new(period)?.streaming())
    }

    fn with_alpha(alpha: f64) -> Self {
        Self {
            alpha,
            current: None,
        }
    }

    fn advance(&mut self, value: f64) -> f64 {
        let next = match self.current {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.current = Some(next);
        next
    }
}

impl StreamingIndicator for StreamingEma {
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        Some(self.advance(value))
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}

/// SMA of one series column.
pub fn sma(
    series: &Series,
    period: usize,
    source: PriceSource,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    Ok(Sma::new(period)?.compute(series.candles(), source))
}

/// EMA of one series column.
pub fn ema(
    series: &Series,
    period: usize,
    source: PriceSource,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    Ok(Ema::new(period)?.compute(series.candles(), source))
}
