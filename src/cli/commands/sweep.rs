//! EMA period sweep command.

use anyhow::{bail, Result};
use dogetrade_backtest::{rank_by_return, sweep};
use dogetrade_config::AppConfig;
use dogetrade_strategies::StrategySpec;
use serde_json::json;
use tracing::info;

use super::{load_series, open_source, validate};
use crate::cli::{OutputFormat, SweepArgs};

pub async fn run(args: SweepArgs, config: &AppConfig) -> Result<()> {
    let mut config = config.clone();
    config.market = args.market.resolve(&config.market);
    if let Some(capital) = args.capital {
        config.backtest.initial_capital = capital;
    }
    validate(&config)?;

    let specs = StrategySpec::ema_grid(&args.fast, &args.slow);
    if specs.is_empty() {
        bail!("No valid fast < slow combination in --fast/--slow");
    }
    info!(combinations = specs.len(), "Starting sweep");

    let source = open_source(&config.market, args.market.csv.as_deref())?;
    let series = load_series(source.as_ref(), &config.market).await?;

    let mut results = rank_by_return(sweep(&series, &specs, &config.backtest.to_engine_config()));
    if let Some(top) = args.top {
        results.truncate(top);
    }

    match args.output {
        OutputFormat::Json => {
            let rows: Vec<_> = results
                .iter()
                .map(|r| match &r.result {
                    Ok(run) => json!({ "spec": r.spec, "report": run.report, "max_drawdown_pct": run.max_drawdown_pct }),
                    Err(e) => json!({ "spec": r.spec, "error": e.to_string() }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            println!(
                "{} {} | {} candles | capital {:.2} USDT",
                series.symbol,
                series.interval,
                series.len(),
                config.backtest.initial_capital
            );
            println!(
                "{:<12} {:>10} {:>8} {:>9} {:>10}",
                "Strategy", "Return %", "Trades", "Win %", "Max DD %"
            );
            println!("───────────────────────────────────────────────────────────");
            for r in &results {
                match &r.result {
                    Ok(run) => println!(
                        "{:<12} {:>10.2} {:>8} {:>9.2} {:>10.2}",
                        r.spec.label(),
                        run.report.return_pct,
                        run.report.trades_count,
                        run.report.winrate_pct,
                        run.max_drawdown_pct
                    ),
                    Err(e) => println!("{:<12} failed: {}", r.spec.label(), e),
                }
            }
        }
    }

    Ok(())
}
