//! The single-pass signal series must match evaluating every prefix.

use dogetrade_core::types::{Candle, Signal};
use dogetrade_core::Strategy;
use dogetrade_strategies::{
    EmaCrossoverConfig, MacdCrossoverConfig, RsiThresholdConfig, StrategySpec,
};
use proptest::prelude::*;

fn candles(prices: &[f64]) -> Vec<Candle> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| Candle::new(i as i64 * 60_000, p, p, p, p, 1.0))
        .collect()
}

fn prefix_replay(strategy: &dyn Strategy, candles: &[Candle]) -> Vec<Signal> {
    (1..=candles.len())
        .map(|n| strategy.evaluate(&candles[..n]))
        .collect()
}

fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.12 + (i as f64 * 0.17).sin() * 0.01 + (i as f64 * 0.05).cos() * 0.004)
        .collect()
}

#[test]
fn default_strategies_match_prefix_replay() {
    let candles = candles(&wave(300));

    for spec in [
        StrategySpec::Ema(EmaCrossoverConfig::default()),
        StrategySpec::Rsi(RsiThresholdConfig::default()),
        StrategySpec::Macd(MacdCrossoverConfig::default()),
    ] {
        let strategy = spec.build().unwrap();
        let batch = strategy.signal_series(&candles);

        assert_eq!(batch.len(), candles.len());
        assert_eq!(batch, prefix_replay(strategy.as_ref(), &candles), "{}", spec);
        assert!(batch.iter().any(Signal::is_actionable), "{} never fired", spec);
    }
}

#[test]
fn empty_input_yields_no_signals() {
    let spec = StrategySpec::default();
    let strategy = spec.build().unwrap();
    assert!(strategy.signal_series(&[]).is_empty());
    assert_eq!(strategy.evaluate(&[]), Signal::Hold);
}

fn arb_prices() -> impl proptest::strategy::Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.05..0.5_f64, 0..80)
}

proptest! {
    #[test]
    fn ema_batch_matches_prefix(prices in arb_prices(), fast in 1usize..6, extra in 1usize..8) {
        let spec = StrategySpec::Ema(EmaCrossoverConfig { fast_period: fast, slow_period: fast + extra });
        let strategy = spec.build().unwrap();
        let candles = candles(&prices);
        prop_assert_eq!(strategy.signal_series(&candles), prefix_replay(strategy.as_ref(), &candles));
    }

    #[test]
    fn rsi_batch_matches_prefix(prices in arb_prices(), period in 1usize..10) {
        let spec = StrategySpec::Rsi(RsiThresholdConfig { period, ..Default::default() });
        let strategy = spec.build().unwrap();
        let candles = candles(&prices);
        prop_assert_eq!(strategy.signal_series(&candles), prefix_replay(strategy.as_ref(), &candles));
    }

    #[test]
    fn macd_batch_matches_prefix(prices in arb_prices(), fast in 1usize..6, extra in 1usize..8, signal in 1usize..6) {
        let spec = StrategySpec::Macd(MacdCrossoverConfig {
            fast_period: fast,
            slow_period: fast + extra,
            signal_period: signal,
        });
        let strategy = spec.build().unwrap();
        let candles = candles(&prices);
        prop_assert_eq!(strategy.signal_series(&candles), prefix_replay(strategy.as_ref(), &candles));
    }
}
