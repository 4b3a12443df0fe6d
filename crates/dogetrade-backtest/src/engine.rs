//! Backtesting engine.

use dogetrade_core::error::BacktestError;
use dogetrade_core::traits::Strategy;
use dogetrade_core::types::{Candle, Series, Signal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::report::BacktestRun;
use crate::statistics::{BacktestStats, Position, PositionSide, Trade};

/// How the per-bar signals are obtained from the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalReplay {
    /// One pass over the whole series through `Strategy::signal_series`.
    #[default]
    Precomputed,
    /// `Strategy::evaluate` on every prefix. Quadratic, kept as the
    /// reference the precomputed replay is checked against.
    Prefix,
}

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Initial capital (USDT)
    pub initial_capital: f64,
    /// Signal replay mode
    #[serde(default)]
    pub replay: SignalReplay,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            replay: SignalReplay::Precomputed,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(BacktestError::InvalidConfig(format!(
                "Initial capital must be a positive number, got {}",
                self.initial_capital
            )));
        }
        Ok(())
    }
}

/// Cash balance plus the single open position.
#[derive(Debug, Clone)]
struct Account {
    balance: f64,
    position: Position,
}

impl Account {
    fn new(balance: f64) -> Self {
        Self {
            balance,
            position: Position::default(),
        }
    }

    /// Close the open position at `candle.close`, returning the trade.
    fn close(&mut self, candle: &Candle) -> Option<Trade> {
        let price = candle.close;
        let position = self.position;
        let pnl = position.unrealized_pnl(price);

        match position.side {
            PositionSide::Flat => return None,
            PositionSide::Long => self.balance = position.size * price,
            PositionSide::Short => self.balance += pnl,
        }
        self.position = Position::default();

        Some(Trade {
            side: position.side,
            entry_price: position.entry_price,
            exit_price: price,
            resulting_balance: self.balance,
            entry_timestamp: position.entry_timestamp,
            exit_timestamp: candle.timestamp,
            pnl,
        })
    }

    /// Open a position with the whole balance at `candle.close`.
    fn open(&mut self, side: PositionSide, candle: &Candle) {
        self.position = Position {
            side,
            entry_price: candle.close,
            size: self.balance / candle.close,
            entry_timestamp: candle.timestamp,
        };
    }

    /// Apply one bar's signal. Returns the trade closed by a reversal.
    fn apply(&mut self, signal: Signal, candle: &Candle) -> Option<Trade> {
        let target = match signal {
            Signal::Buy => PositionSide::Long,
            Signal::Sell => PositionSide::Short,
            Signal::Hold => return None,
        };
        if self.position.side == target {
            return None;
        }

        let trade = self.close(candle);
        self.open(target, candle);
        debug!(
            timestamp = candle.timestamp,
            price = candle.close,
            side = %target,
            balance = self.balance,
            "Position opened"
        );
        trade
    }

    fn equity(&self, price: f64) -> f64 {
        self.position.equity(self.balance, price)
    }
}

/// Backtesting engine.
///
/// Replays a strategy's signals bar by bar against one series, always
/// holding at most one position sized with the whole balance. Fees and
/// slippage are not modeled.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    fn signals(&self, strategy: &dyn Strategy, candles: &[Candle]) -> Vec<Signal> {
        match self.config.replay {
            SignalReplay::Precomputed => strategy.signal_series(candles),
            SignalReplay::Prefix => (1..=candles.len())
                .map(|n| strategy.evaluate(&candles[..n]))
                .collect(),
        }
    }

    /// Run a backtest.
    pub fn run(&self, strategy: &dyn Strategy, series: &Series) -> Result<BacktestRun, BacktestError> {
        self.config.validate()?;
        let candles = series.candles();
        let Some(last) = candles.last() else {
            return Err(BacktestError::EmptySeries);
        };

        let signals = self.signals(strategy, candles);
        let mut account = Account::new(self.config.initial_capital);
        let mut stats = BacktestStats::new(self.config.initial_capital);

        for (i, candle) in candles.iter().enumerate() {
            // A short signal series leaves the remaining bars on HOLD.
            let signal = signals.get(i).copied().unwrap_or_default();
            if let Some(trade) = account.apply(signal, candle) {
                debug!(side = %trade.side, pnl = trade.pnl, balance = trade.resulting_balance, "Trade closed");
                stats.add_trade(trade);
            }
            stats.record_equity(candle.timestamp, account.equity(candle.close));
        }

        // The end-of-series close only settles the balance; it is not a trade.
        let _ = account.close(last);
        let report = stats.report(account.balance);

        info!(
            strategy = strategy.name(),
            symbol = %series.symbol,
            bars = candles.len(),
            trades = report.trades_count,
            final_balance = report.final_balance,
            return_pct = report.return_pct,
            "Backtest complete"
        );

        let max_drawdown_pct = stats.max_drawdown_pct();
        let (trades, equity_curve) = stats.into_parts();
        Ok(BacktestRun {
            strategy: strategy.name().to_string(),
            symbol: series.symbol.clone(),
            bars: candles.len(),
            report,
            trades,
            equity_curve,
            max_drawdown_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogetrade_core::types::{IndicatorFrame, Interval};

    /// Replays a fixed signal list.
    struct Scripted(Vec<Signal>);

    impl Strategy for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn warmup_period(&self) -> usize {
            0
        }

        fn evaluate(&self, candles: &[Candle]) -> Signal {
            candles
                .len()
                .checked_sub(1)
                .and_then(|i| self.0.get(i).copied())
                .unwrap_or_default()
        }

        fn indicators(&self, candles: &[Candle]) -> IndicatorFrame {
            IndicatorFrame::new(candles.len())
        }
    }

    fn series(closes: &[f64]) -> Series {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64 * 900_000, c, c, c, c, 1.0))
            .collect();
        Series::new("DOGEUSDT", Interval::Minute15, candles).unwrap()
    }

    fn engine() -> BacktestEngine {
        BacktestEngine::new(BacktestConfig::default())
    }

    #[test]
    fn test_long_round_trip() {
        use Signal::*;
        let strategy = Scripted(vec![Buy, Hold, Sell]);
        let run = engine().run(&strategy, &series(&[10.0, 11.0, 12.0])).unwrap();

        // BUY@10, SELL@12 closes the long; the short opened at 12 is settled flat.
        assert_eq!(run.report.trades_count, 1);
        assert!((run.report.final_balance - 1200.0).abs() < 1e-9);
        assert!((run.report.net_profit - 200.0).abs() < 1e-9);
        assert!((run.report.return_pct - 20.0).abs() < 1e-9);
        assert_eq!(run.report.winrate_pct, 100.0);

        let trade = &run.trades[0];
        assert_eq!(trade.side, PositionSide::Long);
        assert_eq!(trade.entry_price, 10.0);
        assert_eq!(trade.exit_price, 12.0);
        assert_eq!(trade.exit_timestamp, 1_800_000);
    }

    #[test]
    fn test_short_then_reverse() {
        use Signal::*;
        let strategy = Scripted(vec![Sell, Buy, Hold]);
        let run = engine().run(&strategy, &series(&[10.0, 8.0, 9.0])).unwrap();

        // short 100 coins at 10, cover at 8: +200
        let trade = &run.trades[0];
        assert_eq!(trade.side, PositionSide::Short);
        assert!((trade.pnl - 200.0).abs() < 1e-9);
        assert!((trade.resulting_balance - 1200.0).abs() < 1e-9);

        // long 150 coins at 8, marked at 9
        assert!((run.report.final_balance - 1350.0).abs() < 1e-9);
        assert_eq!(run.report.trades_count, 1);
    }

    #[test]
    fn test_equity_curve_marks_every_bar() {
        use Signal::*;
        let strategy = Scripted(vec![Hold, Buy, Hold, Sell, Hold]);
        let run = engine()
            .run(&strategy, &series(&[5.0, 10.0, 12.0, 8.0, 6.0]))
            .unwrap();

        let equity: Vec<f64> = run.equity_curve.iter().map(|p| p.equity).collect();
        // flat, long 100 coins, long, closed at 8 then short 100 coins at 8, short marked at 6
        let expected = [1000.0, 1000.0, 1200.0, 800.0, 1000.0];
        for (got, want) in equity.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
        // 1200 -> 800
        assert!((run.max_drawdown_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_signals_are_ignored() {
        use Signal::*;
        let strategy = Scripted(vec![Buy, Buy, Buy]);
        let run = engine().run(&strategy, &series(&[1.0, 2.0, 4.0])).unwrap();

        assert_eq!(run.report.trades_count, 0);
        assert!((run.report.final_balance - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_is_error() {
        let strategy = Scripted(vec![]);
        let empty = Series::empty("DOGEUSDT", Interval::Minute15);
        assert!(matches!(
            engine().run(&strategy, &empty),
            Err(BacktestError::EmptySeries)
        ));
    }

    #[test]
    fn test_invalid_capital_is_error() {
        let strategy = Scripted(vec![]);
        for capital in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let engine = BacktestEngine::new(BacktestConfig {
                initial_capital: capital,
                ..Default::default()
            });
            assert!(matches!(
                engine.run(&strategy, &series(&[1.0])),
                Err(BacktestError::InvalidConfig(_))
            ));
        }
    }
}
