//! Validate configuration command.

use anyhow::Result;
use dogetrade_config::AppConfig;

use crate::cli::ValidateArgs;

pub async fn run(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Market: {} {} ({} candles)",
        config.market.symbol, config.market.interval, config.market.limit
    );
    println!("Strategy: {}", config.strategy);
    println!("Initial capital: {:.2} USDT", config.backtest.initial_capital);

    if args.show {
        println!();
        println!("{}", config.to_toml()?);
    }

    Ok(())
}
