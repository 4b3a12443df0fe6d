//! Backtest statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::BacktestReport;

/// Direction of the simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PositionSide::Flat => "FLAT",
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        };
        f.write_str(s)
    }
}

/// The single position held by the simulator.
///
/// `size` is in coin units and is always the whole balance divided by the
/// entry price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub entry_price: f64,
    pub size: f64,
    /// Open time of the entry candle (Unix milliseconds)
    pub entry_timestamp: i64,
}

impl Position {
    /// Mark-to-market value of the account holding this position.
    ///
    /// While LONG the balance is fully converted into coins, so the stored
    /// balance is stale and the coins alone carry the value.
    pub fn equity(&self, balance: f64, price: f64) -> f64 {
        match self.side {
            PositionSide::Flat => balance,
            PositionSide::Long => self.size * price,
            PositionSide::Short => balance + self.unrealized_pnl(price),
        }
    }

    /// Profit of closing this position at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.side {
            PositionSide::Flat => 0.0,
            PositionSide::Long => self.size * (price - self.entry_price),
            PositionSide::Short => self.size * (self.entry_price - price),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }
}

/// Record of a closed round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Direction of the closed position
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Account balance right after the close
    pub resulting_balance: f64,
    pub entry_timestamp: i64,
    pub exit_timestamp: i64,
    /// Realized profit of this trade
    pub pnl: f64,
}

impl Trade {
    /// Whether the balance after this trade exceeds `initial_capital`.
    ///
    /// This compares against the starting capital, not against the balance
    /// before the trade.
    pub fn is_win(&self, initial_capital: f64) -> bool {
        self.resulting_balance > initial_capital
    }
}

/// Account value at the close of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
}

/// Accumulates trades and the equity curve during a run.
#[derive(Debug, Clone)]
pub struct BacktestStats {
    initial_capital: f64,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
    peak_equity: f64,
    max_drawdown_pct: f64,
}

impl BacktestStats {
    /// Create new stats tracker.
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            peak_equity: initial_capital,
            max_drawdown_pct: 0.0,
        }
    }

    /// Record equity at a timestamp.
    pub fn record_equity(&mut self, timestamp: i64, equity: f64) {
        self.equity_curve.push(EquityPoint { timestamp, equity });

        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
        if self.peak_equity > 0.0 {
            let drawdown = (self.peak_equity - equity) / self.peak_equity * 100.0;
            if drawdown > self.max_drawdown_pct {
                self.max_drawdown_pct = drawdown;
            }
        }
    }

    /// Add a trade record.
    pub fn add_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    /// Largest peak-to-trough fall of the equity curve, in percent.
    pub fn max_drawdown_pct(&self) -> f64 {
        self.max_drawdown_pct
    }

    /// Build the final report from the balance after the end-of-series close.
    pub fn report(&self, final_balance: f64) -> BacktestReport {
        let initial = self.initial_capital;
        let trades_count = self.trades.len();
        let winrate_pct = if trades_count > 0 {
            let wins = self.trades.iter().filter(|t| t.is_win(initial)).count();
            wins as f64 / trades_count as f64 * 100.0
        } else {
            0.0
        };

        BacktestReport {
            initial_capital: initial,
            final_balance,
            net_profit: final_balance - initial,
            return_pct: (final_balance / initial - 1.0) * 100.0,
            trades_count,
            winrate_pct,
        }
    }

    /// Consume the tracker, returning the trade log and the equity curve.
    pub fn into_parts(self) -> (Vec<Trade>, Vec<EquityPoint>) {
        (self.trades, self.equity_curve)
    }
}
