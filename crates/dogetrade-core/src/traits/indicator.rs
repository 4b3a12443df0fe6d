//! Indicator trait definitions.

use crate::types::{Candle, PriceSource};

/// Trait for batch technical indicators.
///
/// Indicators are pure functions of their parameters and the input
/// column. Outputs are aligned 1:1 with the input; positions inside the
/// warm-up window hold `None` rather than a placeholder value.
pub trait Indicator: Send + Sync {
    /// The output type, e.g. `Vec<Option<f64>>` or a struct of aligned columns.
    type Output;

    /// Calculate indicator values for a raw input column.
    fn calculate(&self, data: &[f64]) -> Self::Output;

    /// Number of leading inputs needed before the first defined value.
    fn warmup_period(&self) -> usize;

    /// Get the name of the indicator, e.g. `ema_21`.
    fn name(&self) -> &str;

    /// Calculate over one column of a candle slice.
    fn compute(&self, candles: &[Candle], source: PriceSource) -> Self::Output {
        self.calculate(&source.extract_all(candles))
    }
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators can be updated
/// incrementally with new data points.
pub trait StreamingIndicator: Send + Sync {
    type Output;

    /// Update the indicator with a new value.
    ///
    /// # Returns
    /// The current indicator value, or None if not yet ready
    fn update(&mut self, value: f64) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RunningSum {
        period: usize,
    }

    impl Indicator for RunningSum {
        type Output = Vec<Option<f64>>;

        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.period).then(|| data[i + 1 - self.period..=i].iter().sum::<f64>())
                })
                .collect()
        }

        fn warmup_period(&self) -> usize {
            self.period - 1
        }

        fn name(&self) -> &str {
            "sum"
        }
    }

    #[test]
    fn test_compute_uses_selected_column() {
        let indicator = RunningSum { period: 2 };
        let candles = vec![
            Candle::new(1, 1.0, 2.0, 0.5, 1.5, 10.0),
            Candle::new(2, 2.0, 3.0, 1.5, 2.5, 20.0),
        ];

        assert_eq!(
            indicator.compute(&candles, PriceSource::Close),
            vec![None, Some(4.0)]
        );
        assert_eq!(
            indicator.compute(&candles, PriceSource::Volume),
            vec![None, Some(30.0)]
        );
    }
}
