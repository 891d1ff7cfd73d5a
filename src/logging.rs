//! Logging initialization.
//!
//! Structured logging via `tracing`. The filter comes from the
//! `CURSUS_LOG` env var (same syntax as `RUST_LOG`), defaulting to `warn`
//! so normal CLI output stays clean.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("CURSUS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
