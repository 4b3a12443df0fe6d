//! Parameter sweeps.
//!
//! Runs one independent backtest per strategy spec over the same series.
//! Runs share nothing but the read-only series, so they fan out across the
//! rayon pool.

use dogetrade_core::error::TradingError;
use dogetrade_core::types::Series;
use dogetrade_strategies::StrategySpec;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::engine::{BacktestConfig, BacktestEngine};
use crate::report::BacktestRun;

/// Outcome of one sweep entry.
#[derive(Debug)]
pub struct SweepResult {
    pub spec: StrategySpec,
    /// The run, or why it could not be built or run
    pub result: Result<BacktestRun, TradingError>,
}

impl SweepResult {
    /// Return of a successful run.
    pub fn return_pct(&self) -> Option<f64> {
        self.result.as_ref().ok().map(|run| run.report.return_pct)
    }
}

fn run_one(engine: &BacktestEngine, series: &Series, spec: &StrategySpec) -> SweepResult {
    let result = spec
        .build()
        .map_err(TradingError::from)
        .and_then(|strategy| {
            engine
                .run(strategy.as_ref(), series)
                .map_err(TradingError::from)
        });

    if let Err(e) = &result {
        warn!(spec = %spec, error = %e, "Sweep entry failed");
    }
    SweepResult {
        spec: spec.clone(),
        result,
    }
}

/// Backtest every spec against `series`, in parallel.
///
/// Results are returned in the order of `specs`.
pub fn sweep(series: &Series, specs: &[StrategySpec], config: &BacktestConfig) -> Vec<SweepResult> {
    let engine = BacktestEngine::new(config.clone());
    let results: Vec<SweepResult> = specs
        .par_iter()
        .map(|spec| run_one(&engine, series, spec))
        .collect();

    info!(
        symbol = %series.symbol,
        runs = results.len(),
        failed = results.iter().filter(|r| r.result.is_err()).count(),
        "Sweep complete"
    );
    results
}

/// Sort by return, best first. Failed entries go last.
pub fn rank_by_return(mut results: Vec<SweepResult>) -> Vec<SweepResult> {
    results.sort_by(|a, b| match (a.return_pct(), b.return_pct()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    results
}
