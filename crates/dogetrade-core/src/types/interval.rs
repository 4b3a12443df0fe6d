//! Candle interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candle interval, using the exchange's kline notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    #[default]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
    #[serde(rename = "1M")]
    Monthly,
}

impl Interval {
    /// Duration of one candle in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Interval::Minute1 => 60,
            Interval::Minute5 => 300,
            Interval::Minute15 => 900,
            Interval::Minute30 => 1800,
            Interval::Hour1 => 3600,
            Interval::Hour4 => 14400,
            Interval::Daily => 86400,
            Interval::Weekly => 604800,
            Interval::Monthly => 2592000, // Approximate (30 days)
        }
    }

    /// Duration of one candle in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.as_secs() * 1000
    }

    /// Exchange notation, e.g. `15m`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Daily => "1d",
            Interval::Weekly => "1w",
            Interval::Monthly => "1M",
        }
    }

    /// All supported intervals.
    pub fn all() -> &'static [Interval] {
        &[
            Interval::Minute1,
            Interval::Minute5,
            Interval::Minute15,
            Interval::Minute30,
            Interval::Hour1,
            Interval::Hour4,
            Interval::Daily,
            Interval::Weekly,
            Interval::Monthly,
        ]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) and "1m" (minute) only differ by case.
        if s == "1M" {
            return Ok(Interval::Monthly);
        }
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Interval::Minute1),
            "5m" | "5min" => Ok(Interval::Minute5),
            "15m" | "15min" => Ok(Interval::Minute15),
            "30m" | "30min" => Ok(Interval::Minute30),
            "1h" | "1hour" | "hour" => Ok(Interval::Hour1),
            "4h" | "4hour" => Ok(Interval::Hour4),
            "1d" | "day" | "daily" => Ok(Interval::Daily),
            "1w" | "week" | "weekly" => Ok(Interval::Weekly),
            "month" | "monthly" => Ok(Interval::Monthly),
            _ => Err(format!("Invalid interval: {}", s)),
        }
    }
}
