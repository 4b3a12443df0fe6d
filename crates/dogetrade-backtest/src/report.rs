//! Backtest report generation.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::statistics::{EquityPoint, Trade};

/// Headline results of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Initial capital
    pub initial_capital: f64,
    /// Balance after the end-of-series close
    pub final_balance: f64,
    /// final_balance - initial_capital
    pub net_profit: f64,
    /// (final / initial - 1) * 100
    pub return_pct: f64,
    /// Number of closed trades (the end-of-series close is not counted)
    pub trades_count: usize,
    /// Share of trades whose resulting balance beats the initial capital
    pub winrate_pct: f64,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    /// Strategy display name
    pub strategy: String,
    /// Trading pair of the replayed series
    pub symbol: String,
    /// Number of bars replayed
    pub bars: usize,
    pub report: BacktestReport,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// Largest peak-to-trough fall of the equity curve, in percent
    pub max_drawdown_pct: f64,
}

impl BacktestRun {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let r = &self.report;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        let _ = writeln!(s, "  Strategy:            {}", self.strategy);
        let _ = writeln!(s, "  Symbol:              {}", self.symbol);
        let _ = writeln!(s, "  Candles:             {}", self.bars);
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        let _ = writeln!(s, "  Initial Capital:     {:.2} USDT", r.initial_capital);
        let _ = writeln!(s, "  Final Balance:       {:.2} USDT", r.final_balance);
        let _ = writeln!(s, "  Net Profit:          {:.2} USDT", r.net_profit);
        let _ = writeln!(s, "  Return:              {:.2}%", r.return_pct);
        let _ = writeln!(s, "  Max Drawdown:        {:.2}%", self.max_drawdown_pct);
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        let _ = writeln!(s, "  Trades:              {}", r.trades_count);
        let _ = writeln!(s, "  Win Rate:            {:.2}%", r.winrate_pct);
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the trade log to CSV.
    pub fn trades_to_csv(&self) -> String {
        let mut csv = String::from(
            "side,entry_timestamp,entry_price,exit_timestamp,exit_price,pnl,resulting_balance\n",
        );
        for t in &self.trades {
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{}",
                t.side,
                t.entry_timestamp,
                t.entry_price,
                t.exit_timestamp,
                t.exit_price,
                t.pnl,
                t.resulting_balance
            );
        }
        csv
    }

    /// Export the equity curve to CSV.
    pub fn equity_to_csv(&self) -> String {
        let mut csv = String::from("timestamp,equity\n");
        for point in &self.equity_curve {
            let _ = writeln!(csv, "{},{}", point.timestamp, point.equity);
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::PositionSide;

    fn sample_run() -> BacktestRun {
        BacktestRun {
            strategy: "EMA Crossover (9/21)".into(),
            symbol: "DOGEUSDT".into(),
            bars: 3,
            report: BacktestReport {
                initial_capital: 1000.0,
                final_balance: 1100.0,
                net_profit: 100.0,
                return_pct: 10.0,
                trades_count: 1,
                winrate_pct: 100.0,
            },
            trades: vec![Trade {
                side: PositionSide::Long,
                entry_price: 0.1,
                exit_price: 0.11,
                resulting_balance: 1100.0,
                entry_timestamp: 0,
                exit_timestamp: 900_000,
                pnl: 100.0,
            }],
            equity_curve: vec![
                EquityPoint { timestamp: 0, equity: 1000.0 },
                EquityPoint { timestamp: 900_000, equity: 1100.0 },
            ],
            max_drawdown_pct: 0.0,
        }
    }

    #[test]
    fn test_report_summary() {
        let summary = sample_run().summary();
        assert!(summary.contains("Return"));
        assert!(summary.contains("10.00%"));
        assert!(summary.contains("1100.00 USDT"));
        assert!(summary.contains("DOGEUSDT"));
    }

    #[test]
    fn test_csv_exports() {
        let run = sample_run();

        let trades = run.trades_to_csv();
        let lines: Vec<&str> = trades.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "LONG,0,0.1,900000,0.11,100,1100");

        let equity = run.equity_to_csv();
        assert_eq!(equity, "timestamp,equity\n0,1000\n900000,1100\n");
    }

    #[test]
    fn test_json_export() {
        let json = sample_run().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["trades_count"], 1);
        assert_eq!(value["trades"][0]["side"], "LONG");
    }
}
