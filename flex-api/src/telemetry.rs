//! Telemetry Setup
//!
//! Tracing subscriber initialization for binaries and tests. RUST_LOG
//! takes precedence; the configured level is the fallback.

use tracing_subscriber::EnvFilter;

use flex_core::logging::LogLevel;

/// Initialize tracing at the default info level
pub fn init() {
    init_with_level(LogLevel::Info);
}

/// Initialize tracing with an explicit fallback level. Safe to call more
/// than once; later calls are ignored.
pub fn init_with_level(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
