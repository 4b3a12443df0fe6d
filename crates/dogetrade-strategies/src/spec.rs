//! Configuration-time strategy selection.
//!
//! A strategy is chosen once, from its short name and parameters, and then
//! used through `dyn Strategy` for the rest of the run.

use std::fmt;
use std::str::FromStr;

use dogetrade_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
};
use serde::{Deserialize, Serialize};

use crate::{
    EmaCrossoverConfig, EmaCrossoverStrategy, MacdCrossoverConfig, MacdCrossoverStrategy,
    RsiThresholdConfig, RsiThresholdStrategy,
};

/// The built-in strategy families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrategyKind {
    Ema,
    Rsi,
    Macd,
}

impl StrategyKind {
    pub fn all() -> &'static [StrategyKind] {
        &[StrategyKind::Ema, StrategyKind::Rsi, StrategyKind::Macd]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Ema => "EMA",
            StrategyKind::Rsi => "RSI",
            StrategyKind::Macd => "MACD",
        }
    }

    /// Spec with this kind's default parameters.
    pub fn default_spec(&self) -> StrategySpec {
        match self {
            StrategyKind::Ema => StrategySpec::Ema(EmaCrossoverConfig::default()),
            StrategyKind::Rsi => StrategySpec::Rsi(RsiThresholdConfig::default()),
            StrategyKind::Macd => StrategySpec::Macd(MacdCrossoverConfig::default()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMA" => Ok(StrategyKind::Ema),
            "RSI" => Ok(StrategyKind::Rsi),
            "MACD" => Ok(StrategyKind::Macd),
            _ => Err(StrategyError::NotFound(s.to_string())),
        }
    }
}

/// A strategy kind together with its parameters.
///
/// Serialized with a `kind` tag next to the parameters:
///
/// ```toml
/// kind = "EMA"
/// fast_period = 9
/// slow_period = 21
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StrategySpec {
    #[serde(rename = "EMA", alias = "ema")]
    Ema(EmaCrossoverConfig),
    #[serde(rename = "RSI", alias = "rsi")]
    Rsi(RsiThresholdConfig),
    #[serde(rename = "MACD", alias = "macd")]
    Macd(MacdCrossoverConfig),
}

impl Default for StrategySpec {
    fn default() -> Self {
        StrategySpec::Ema(EmaCrossoverConfig::default())
    }
}

impl StrategySpec {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategySpec::Ema(_) => StrategyKind::Ema,
            StrategySpec::Rsi(_) => StrategyKind::Rsi,
            StrategySpec::Macd(_) => StrategyKind::Macd,
        }
    }

    /// Validate the parameters without building the strategy.
    pub fn validate(&self) -> Result<(), StrategyError> {
        match self {
            StrategySpec::Ema(config) => config.validate(),
            StrategySpec::Rsi(config) => config.validate(),
            StrategySpec::Macd(config) => config.validate(),
        }
    }

    /// Build the strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        let strategy: Box<dyn Strategy> = match self {
            StrategySpec::Ema(config) => Box::new(EmaCrossoverStrategy::new(config.clone())?),
            StrategySpec::Rsi(config) => Box::new(RsiThresholdStrategy::new(config.clone())?),
            StrategySpec::Macd(config) => Box::new(MacdCrossoverStrategy::new(config.clone())?),
        };
        Ok(strategy)
    }

    /// Short human-readable label, e.g. `EMA 9/21`.
    pub fn label(&self) -> String {
        match self {
            StrategySpec::Ema(c) => format!("EMA {}/{}", c.fast_period, c.slow_period),
            StrategySpec::Rsi(c) => format!("RSI {} {}/{}", c.period, c.oversold, c.overbought),
            StrategySpec::Macd(c) => format!(
                "MACD {}/{}/{}",
                c.fast_period, c.slow_period, c.signal_period
            ),
        }
    }

    /// All EMA crossover specs with `fast < slow` from the two period lists.
    pub fn ema_grid(fast_periods: &[usize], slow_periods: &[usize]) -> Vec<StrategySpec> {
        fast_periods
            .iter()
            .flat_map(|&fast| {
                slow_periods
                    .iter()
                    .filter(move |&&slow| fast > 0 && fast < slow)
                    .map(move |&slow| {
                        StrategySpec::Ema(EmaCrossoverConfig {
                            fast_period: fast,
                            slow_period: slow,
                        })
                    })
            })
            .collect()
    }
}

impl fmt::Display for StrategySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("EMA".parse::<StrategyKind>().unwrap(), StrategyKind::Ema);
        assert_eq!("rsi".parse::<StrategyKind>().unwrap(), StrategyKind::Rsi);
        assert_eq!("Macd".parse::<StrategyKind>().unwrap(), StrategyKind::Macd);

        let err = "BOLLINGER".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, StrategyError::NotFound(ref name) if name == "BOLLINGER"));
        assert!(err.to_string().contains("BOLLINGER"));
    }

    #[test]
    fn test_default_spec_builds() {
        for kind in StrategyKind::all() {
            let spec = kind.default_spec();
            assert_eq!(spec.kind(), *kind);
            assert!(spec.build().is_ok());
        }
        assert_eq!(StrategySpec::default().label(), "EMA 9/21");
    }

    #[test]
    fn test_spec_serde_tagged() {
        let spec: StrategySpec =
            serde_json::from_str(r#"{"kind": "MACD", "fast_period": 5, "slow_period": 35}"#)
                .unwrap();
        assert_eq!(
            spec,
            StrategySpec::Macd(MacdCrossoverConfig {
                fast_period: 5,
                slow_period: 35,
                signal_period: 9,
            })
        );

        let json = serde_json::to_value(StrategySpec::default()).unwrap();
        assert_eq!(json["kind"], "EMA");
        assert_eq!(json["slow_period"], 21);

        let lower: StrategySpec = serde_json::from_str(r#"{"kind": "rsi"}"#).unwrap();
        assert_eq!(lower, StrategyKind::Rsi.default_spec());
    }

    #[test]
    fn test_invalid_spec_fails_to_build() {
        let spec = StrategySpec::Ema(EmaCrossoverConfig {
            fast_period: 21,
            slow_period: 21,
        });
        assert!(spec.validate().is_err());
        assert!(matches!(spec.build(), Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_ema_grid_skips_invalid_pairs() {
        let grid = StrategySpec::ema_grid(&[5, 9, 21], &[9, 21]);
        let labels: Vec<String> = grid.iter().map(StrategySpec::label).collect();
        assert_eq!(labels, vec!["EMA 5/9", "EMA 5/21", "EMA 9/21"]);
    }
}
