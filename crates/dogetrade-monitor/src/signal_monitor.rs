//! Closed-candle signal monitor.

use dogetrade_core::error::DataError;
use dogetrade_core::traits::{MarketDataSource, Strategy};
use dogetrade_core::types::{Candle, Series, SignalEvent};
use tracing::{debug, info};

use crate::history::SignalHistory;

/// Feeds closed candles to a strategy and records every resulting signal.
///
/// Keeps a rolling window of candles, never smaller than the strategy's
/// warmup, so memory stays bounded on long runs.
pub struct SignalMonitor {
    strategy: Box<dyn Strategy>,
    series: Series,
    history: SignalHistory,
}

impl SignalMonitor {
    /// Create a monitor seeded with historical candles.
    ///
    /// Only the most recent `window` candles of `seed` are kept.
    pub fn new(
        strategy: Box<dyn Strategy>,
        seed: &Series,
        window: usize,
        history_capacity: usize,
    ) -> Result<Self, DataError> {
        let window = window.max(strategy.warmup_period()).max(1);
        let mut series = Series::with_capacity(seed.symbol.clone(), seed.interval, window);
        let skip = seed.len().saturating_sub(window);
        for candle in seed.iter().skip(skip) {
            series.push(*candle)?;
        }

        debug!(
            strategy = strategy.name(),
            symbol = %series.symbol,
            seeded = series.len(),
            window,
            "Signal monitor ready"
        );

        Ok(Self {
            strategy,
            series,
            history: SignalHistory::new(history_capacity),
        })
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    /// Signal for the latest candle held, without recording it.
    pub fn current_signal(&self) -> Option<SignalEvent> {
        let last = self.series.last()?;
        Some(self.event_for(last))
    }

    fn event_for(&self, candle: &Candle) -> SignalEvent {
        SignalEvent {
            timestamp: candle.timestamp,
            signal: self.strategy.evaluate(self.series.candles()),
            price: candle.close,
            strategy: self.strategy.name().to_string(),
        }
    }

    /// Append a closed candle, evaluate, and record the signal.
    ///
    /// Candles not newer than the last one held are rejected.
    pub fn on_closed_candle(&mut self, candle: Candle) -> Result<SignalEvent, DataError> {
        self.series.push(candle)?;
        let event = self.event_for(&candle);

        if event.signal.is_actionable() {
            info!(
                strategy = %event.strategy,
                signal = %event.signal,
                price = event.price,
                time = %event.datetime().format("%Y-%m-%d %H:%M"),
                "Signal"
            );
        } else {
            debug!(price = event.price, time = %event.datetime().format("%Y-%m-%d %H:%M"), "HOLD");
        }

        self.history.push(event.clone());
        Ok(event)
    }

    /// Fetch the latest candles and process the ones not seen yet.
    pub async fn poll(
        &mut self,
        source: &dyn MarketDataSource,
        limit: usize,
    ) -> Result<Vec<SignalEvent>, DataError> {
        let latest = source
            .fetch_series(&self.series.symbol, self.series.interval, limit)
            .await?;
        let after = self.series.last().map(|c| c.timestamp).unwrap_or(i64::MIN);

        let mut events = Vec::new();
        for candle in latest.iter().filter(|c| c.timestamp > after) {
            events.push(self.on_closed_candle(*candle)?);
        }
        if events.is_empty() {
            debug!(source = source.name(), "No new closed candles");
        }
        Ok(events)
    }
}
