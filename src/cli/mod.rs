//! CLI definitions.

pub mod commands;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dogetrade_backtest::SignalReplay;
use dogetrade_config::{load_config, AppConfig, MarketSettings};
use dogetrade_core::types::Interval;
use dogetrade_strategies::{StrategyKind, StrategySpec};
use std::path::{Path, PathBuf};

/// Configuration file picked up when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "dogetrade")]
#[command(author, version, about = "Crypto futures signal generator and backtester")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, global = true, env = "DOGETRADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(short, long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Backtest one strategy over historical candles
    Backtest(BacktestArgs),
    /// Print the current signal, optionally watching for new candles
    Signal(SignalArgs),
    /// Backtest a grid of EMA crossover periods
    Sweep(SweepArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

/// Where candles come from.
#[derive(clap::Args, Clone, Default)]
pub struct MarketArgs {
    /// Trading pair, e.g. DOGEUSDT
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Candle interval (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w, 1M)
    #[arg(short, long)]
    pub interval: Option<Interval>,

    /// Number of candles to fetch
    #[arg(long)]
    pub limit: Option<usize>,

    /// Read candles from a CSV file instead of Binance
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl MarketArgs {
    /// Apply command-line overrides on top of the configured market.
    pub fn resolve(&self, base: &MarketSettings) -> MarketSettings {
        let mut market = base.clone();
        if let Some(symbol) = &self.symbol {
            market.symbol = symbol.to_uppercase();
        }
        if let Some(interval) = self.interval {
            market.interval = interval;
        }
        if let Some(limit) = self.limit {
            market.limit = limit;
        }
        market
    }
}

/// Strategy selection and parameter overrides.
#[derive(clap::Args, Clone, Default)]
pub struct StrategyArgs {
    /// Strategy (EMA, RSI, MACD)
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    /// Fast period (EMA, MACD)
    #[arg(long)]
    pub fast: Option<usize>,

    /// Slow period (EMA, MACD)
    #[arg(long)]
    pub slow: Option<usize>,

    /// Signal line period (MACD)
    #[arg(long)]
    pub signal: Option<usize>,

    /// RSI period
    #[arg(long)]
    pub period: Option<usize>,

    /// RSI oversold threshold
    #[arg(long)]
    pub oversold: Option<f64>,

    /// RSI overbought threshold
    #[arg(long)]
    pub overbought: Option<f64>,
}

impl StrategyArgs {
    /// Apply command-line overrides on top of the configured strategy.
    ///
    /// Selecting a different kind starts from that kind's defaults.
    /// Parameters that do not belong to the selected kind are rejected.
    pub fn resolve(&self, base: &StrategySpec) -> Result<StrategySpec> {
        let mut spec = match self.strategy {
            Some(kind) if kind != base.kind() => kind.default_spec(),
            _ => base.clone(),
        };

        match &mut spec {
            StrategySpec::Ema(config) => {
                self.reject(&[
                    ("--signal", self.signal.is_some()),
                    ("--period", self.period.is_some()),
                    ("--oversold", self.oversold.is_some()),
                    ("--overbought", self.overbought.is_some()),
                ])?;
                config.fast_period = self.fast.unwrap_or(config.fast_period);
                config.slow_period = self.slow.unwrap_or(config.slow_period);
            }
            StrategySpec::Rsi(config) => {
                self.reject(&[
                    ("--fast", self.fast.is_some()),
                    ("--slow", self.slow.is_some()),
                    ("--signal", self.signal.is_some()),
                ])?;
                config.period = self.period.unwrap_or(config.period);
                config.oversold = self.oversold.unwrap_or(config.oversold);
                config.overbought = self.overbought.unwrap_or(config.overbought);
            }
            StrategySpec::Macd(config) => {
                self.reject(&[
                    ("--period", self.period.is_some()),
                    ("--oversold", self.oversold.is_some()),
                    ("--overbought", self.overbought.is_some()),
                ])?;
                config.fast_period = self.fast.unwrap_or(config.fast_period);
                config.slow_period = self.slow.unwrap_or(config.slow_period);
                config.signal_period = self.signal.unwrap_or(config.signal_period);
            }
        }

        spec.validate().context("Invalid strategy parameters")?;
        Ok(spec)
    }

    fn reject(&self, flags: &[(&str, bool)]) -> Result<()> {
        let given: Vec<&str> = flags
            .iter()
            .filter(|(_, set)| *set)
            .map(|(flag, _)| *flag)
            .collect();
        if !given.is_empty() {
            bail!(
                "{} not applicable to the selected strategy",
                given.join(", ")
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReplayArg {
    Precomputed,
    Prefix,
}

impl From<ReplayArg> for SignalReplay {
    fn from(arg: ReplayArg) -> Self {
        match arg {
            ReplayArg::Precomputed => SignalReplay::Precomputed,
            ReplayArg::Prefix => SignalReplay::Prefix,
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Initial capital (USDT)
    #[arg(long)]
    pub capital: Option<f64>,

    /// Signal replay mode
    #[arg(long)]
    pub replay: Option<ReplayArg>,

    /// Output format (csv prints the trade log)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the full run as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save the equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SignalArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Keep polling for closed candles until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between polls (overrides the configuration file)
    #[arg(long)]
    pub poll_secs: Option<u64>,
}

#[derive(clap::Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Fast EMA periods (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "5,7,9,12")]
    pub fast: Vec<usize>,

    /// Slow EMA periods (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "21,26,34,50")]
    pub slow: Vec<usize>,

    /// Initial capital (USDT)
    #[arg(long)]
    pub capital: Option<f64>,

    /// Show only the best N results
    #[arg(long)]
    pub top: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
}

/// The configuration file to read, if any.
///
/// An explicit path must exist; the default one is optional.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            default.exists().then_some(default)
        }
    }
}

/// Load the layered configuration.
pub fn load_app_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = config_path(explicit);
    load_config(path.as_deref()).with_context(|| match &path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogetrade_strategies::{EmaCrossoverConfig, MacdCrossoverConfig, RsiThresholdConfig};

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "dogetrade",
            "backtest",
            "--symbol",
            "solusdt",
            "--interval",
            "1h",
            "--strategy",
            "rsi",
            "--period",
            "7",
            "--output",
            "json",
        ])
        .unwrap();

        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest");
        };
        assert_eq!(args.market.interval, Some(Interval::Hour1));
        assert_eq!(args.strategy.strategy, Some(StrategyKind::Rsi));
        assert!(args.output == OutputFormat::Json);

        let market = args.market.resolve(&MarketSettings::default());
        assert_eq!(market.symbol, "SOLUSDT");
        assert_eq!(market.limit, 500);
    }

    #[test]
    fn test_strategy_overrides() {
        let base = StrategySpec::default();

        let spec = StrategyArgs {
            slow: Some(30),
            ..Default::default()
        }
        .resolve(&base)
        .unwrap();
        assert_eq!(
            spec,
            StrategySpec::Ema(EmaCrossoverConfig {
                fast_period: 9,
                slow_period: 30
            })
        );

        let spec = StrategyArgs {
            strategy: Some(StrategyKind::Macd),
            signal: Some(5),
            ..Default::default()
        }
        .resolve(&base)
        .unwrap();
        assert_eq!(
            spec,
            StrategySpec::Macd(MacdCrossoverConfig {
                signal_period: 5,
                ..Default::default()
            })
        );

        let spec = StrategyArgs {
            strategy: Some(StrategyKind::Rsi),
            ..Default::default()
        }
        .resolve(&base)
        .unwrap();
        assert_eq!(spec, StrategySpec::Rsi(RsiThresholdConfig::default()));
    }

    #[test]
    fn test_strategy_override_errors() {
        let base = StrategySpec::default();

        let foreign = StrategyArgs {
            period: Some(14),
            ..Default::default()
        };
        assert!(foreign.resolve(&base).is_err());

        let inverted = StrategyArgs {
            fast: Some(30),
            slow: Some(10),
            ..Default::default()
        };
        assert!(inverted.resolve(&base).is_err());
    }

    #[test]
    fn test_explicit_config_path_is_kept() {
        let path = Path::new("/tmp/custom.toml");
        assert_eq!(config_path(Some(path)), Some(path.to_path_buf()));
    }
}
