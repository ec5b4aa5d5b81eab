// Logging setup on tracing / tracing-subscriber
// RUST_LOG overrides the default filter, e.g. RUST_LOG=shiftopt=debug

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Defaults to `info`, or `debug` for this crate when `verbose` is set.
pub fn init(verbose: bool) {
    let default = if verbose { "info,shiftopt=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Subscriber for tests: debug level, captured by the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
