//! Diagnostics for the host process.
//!
//! stdout carries the frame stream, so everything here goes to stderr.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Reads `RUST_LOG`, defaulting to `warn`.
///
/// ```bash
/// RUST_LOG=navstack_host_runtime=trace,nav_host=debug nav_host
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
