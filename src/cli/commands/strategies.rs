//! List strategies command.

use anyhow::Result;
use dogetrade_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {}", info.name);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", info.default_config);
        println!();
    }

    println!("Use --strategy <name> to select a strategy.");
    println!();
    println!("Strategy names: {}", registry.names().join(", "));

    Ok(())
}
