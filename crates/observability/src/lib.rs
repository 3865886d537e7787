//! Shared tracing setup for the ledger and its workflows.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide structured logging.
///
/// JSON output, filterable through `RUST_LOG`, defaulting to `info`. Safe to
/// call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Plain (non-JSON) initialization for tests, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
