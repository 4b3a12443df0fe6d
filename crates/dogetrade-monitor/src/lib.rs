//! Live signal monitoring and logging setup.

mod history;
mod logging;
mod signal_monitor;

pub use history::SignalHistory;
pub use logging::setup_logging;
pub use signal_monitor::SignalMonitor;
