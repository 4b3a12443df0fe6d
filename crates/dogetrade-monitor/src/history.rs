//! Bounded in-memory signal log.

use dogetrade_core::types::{Signal, SignalEvent};
use std::collections::VecDeque;

/// The most recent signal events, oldest first.
///
/// Once full, each new event evicts the oldest one.
#[derive(Debug, Clone)]
pub struct SignalHistory {
    events: VecDeque<SignalEvent>,
    capacity: usize,
}

impl SignalHistory {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: SignalEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&SignalEvent> {
        self.events.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalEvent> {
        self.events.iter()
    }

    /// The most recent BUY or SELL.
    pub fn last_actionable(&self) -> Option<&SignalEvent> {
        self.events.iter().rev().find(|e| e.signal.is_actionable())
    }

    /// Number of events per signal, as (buy, sell, hold).
    pub fn counts(&self) -> (usize, usize, usize) {
        self.events
            .iter()
            .fold((0, 0, 0), |(buy, sell, hold), e| match e.signal {
                Signal::Buy => (buy + 1, sell, hold),
                Signal::Sell => (buy, sell + 1, hold),
                Signal::Hold => (buy, sell, hold + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: i64, signal: Signal) -> SignalEvent {
        SignalEvent {
            timestamp,
            signal,
            price: 0.1,
            strategy: "test".into(),
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut history = SignalHistory::new(2);
        history.push(event(1, Signal::Buy));
        history.push(event(2, Signal::Hold));
        history.push(event(3, Signal::Sell));

        let timestamps: Vec<i64> = history.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![2, 3]);
        assert_eq!(history.latest().unwrap().signal, Signal::Sell);
    }

    #[test]
    fn test_counts_and_last_actionable() {
        let mut history = SignalHistory::new(10);
        assert!(history.last_actionable().is_none());

        history.push(event(1, Signal::Buy));
        history.push(event(2, Signal::Hold));
        history.push(event(3, Signal::Hold));

        assert_eq!(history.counts(), (1, 0, 2));
        assert_eq!(history.last_actionable().unwrap().timestamp, 1);
    }

    #[test]
    fn test_zero_capacity() {
        let mut history = SignalHistory::new(0);
        history.push(event(1, Signal::Buy));
        history.push(event(2, Signal::Sell));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }
}
