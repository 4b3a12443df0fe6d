//! Strategy registry for dynamic strategy loading.

use dogetrade_core::{error::StrategyError, traits::Strategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{StrategyKind, StrategySpec};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Short name used for selection, e.g. `EMA`
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the built-in strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<StrategyKind, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        for kind in StrategyKind::all() {
            let spec = kind.default_spec();
            // Defaults are known to be valid, but a failure here should
            // drop the entry rather than abort.
            let Ok(strategy) = spec.build() else { continue };
            let default_config = serde_json::to_value(&spec).unwrap_or_default();

            strategies.insert(
                *kind,
                StrategyInfo {
                    name: kind.to_string(),
                    description: strategy.description().to_string(),
                    default_config,
                },
            );
        }

        Self { strategies }
    }

    /// List all available strategies.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        let kind: StrategyKind = name.parse().ok()?;
        self.strategies.get(&kind)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(StrategyKind::as_str).collect()
    }

    /// Create a strategy instance from a name and a JSON parameter object.
    ///
    /// Missing parameters take their defaults.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        self.spec(name, config)?.build()
    }

    /// Resolve a name and a JSON parameter object into a spec.
    pub fn spec(&self, name: &str, config: serde_json::Value) -> Result<StrategySpec, StrategyError> {
        let kind: StrategyKind = name.parse()?;

        let mut params = match config {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(StrategyError::InvalidConfig(format!(
                    "Strategy parameters must be an object, got {}",
                    other
                )))
            }
        };
        params.insert("kind".into(), serde_json::Value::String(kind.to_string()));

        let spec: StrategySpec = serde_json::from_value(serde_json::Value::Object(params))
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let kind: StrategyKind = name.parse()?;
        kind.default_spec().build()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
