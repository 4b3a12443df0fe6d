//! Volatility indicators.
//!
//! Standard deviations here are sample deviations (divided by `n - 1`),
//! so every window needs at least two values.

use dogetrade_core::error::IndicatorError;
use dogetrade_core::traits::Indicator;
use dogetrade_core::types::{PriceSource, Series};
use serde::{Deserialize, Serialize};

use crate::moving_average::{validate_period, Sma};

fn sample_std_dev(window: &[f64], mean: f64) -> f64 {
    let sum_sq: f64 = window.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (window.len() - 1) as f64).sqrt()
}

/// Rolling sample standard deviation.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    name: String,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        validate_period("StdDev", period, 2)?;
        Ok(Self {
            period,
            name: format!("stddev_{}", period),
        })
    }
}

impl Indicator for StdDev {
    type Output = Vec<Option<f64>>;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        let period_f64 = self.period as f64;

        for (offset, window) in data.windows(self.period).enumerate() {
            let mean = window.iter().sum::<f64>() / period_f64;
            result[offset + self.period - 1] = Some(sample_std_dev(window, mean));
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

/// Bollinger Bands output columns, aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    /// Upper band
    pub upper: Vec<Option<f64>>,
    /// Middle band (SMA)
    pub middle: Vec<Option<f64>>,
    /// Lower band
    pub lower: Vec<Option<f64>>,
    /// Bandwidth ((upper - lower) / middle), 0 when the middle band is 0
    pub bandwidth: Vec<Option<f64>>,
}

impl BollingerSeries {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Check if price is above the upper band at `index`.
    pub fn is_overbought(&self, index: usize, price: f64) -> bool {
        matches!(self.upper.get(index), Some(Some(upper)) if price > *upper)
    }

    /// Check if price is below the lower band at `index`.
    pub fn is_oversold(&self, index: usize, price: f64) -> bool {
        matches!(self.lower.get(index), Some(Some(lower)) if price < *lower)
    }
}

/// Bollinger Bands.
///
/// A middle band (SMA) with upper and lower bands at `std_factor` sample
/// standard deviations. A window with zero deviation collapses all three
/// bands onto the middle.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    sma: Sma,
    std_factor: f64,
    name: String,
}

impl BollingerBands {
    /// Create Bollinger Bands with custom parameters (commonly 20, 2.0).
    pub fn new(period: usize, std_factor: f64) -> Result<Self, IndicatorError> {
        validate_period("Bollinger", period, 2)?;
        if !std_factor.is_finite() || std_factor <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "Bollinger std factor must be positive, got {}",
                std_factor
            )));
        }
        Ok(Self {
            sma: Sma::new(period)?,
            std_factor,
            name: format!("bb_{}_{}", period, std_factor),
        })
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerSeries;

    fn calculate(&self, data: &[f64]) -> BollingerSeries {
        let period = self.sma.period();
        let middle = self.sma.calculate(data);
        let mut upper = vec![None; data.len()];
        let mut lower = vec![None; data.len()];
        let mut bandwidth = vec![None; data.len()];

        for (offset, window) in data.windows(period).enumerate() {
            let i = offset + period - 1;
            let Some(mean) = middle[i] else { continue };
            let width = self.std_factor * sample_std_dev(window, mean);

            upper[i] = Some(mean + width);
            lower[i] = Some(mean - width);
            bandwidth[i] = Some(if mean != 0.0 { 2.0 * width / mean } else { 0.0 });
        }

        BollingerSeries {
            upper,
            middle,
            lower,
            bandwidth,
        }
    }

    fn warmup_period(&self) -> usize {
        self.sma.period() - 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rolling sample standard deviation of one series column.
pub fn std_dev(
    series: &Series,
    period: usize,
    source: PriceSource,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    Ok(StdDev::new(period)?.compute(series.candles(), source))
}

/// Bollinger Bands of one series column.
pub fn bollinger_bands(
    series: &Series,
    period: usize,
    std_factor: f64,
    source: PriceSource,
) -> Result<BollingerSeries, IndicatorError> {
    Ok(BollingerBands::new(period, std_factor)?.compute(series.candles(), source))
}
