//! Trading signal types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete action derived for one bar. Carries no sizing information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal together with the price it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    /// Candle open time (Unix milliseconds)
    pub timestamp: i64,
    pub signal: Signal,
    /// Close price of the evaluated candle
    pub price: f64,
    /// Name of the strategy that produced the signal
    pub strategy: String,
}

impl SignalEvent {
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_display_and_serde() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(serde_json::to_string(&Signal::Sell).unwrap(), "\"SELL\"");
        let hold: Signal = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(hold, Signal::Hold);
        assert!(!hold.is_actionable());
        assert!(Signal::Buy.is_actionable());
    }
}
