//! Diagnostic tracing for the launcher.
//!
//! Output goes to stderr only, so the child's stdout stays untouched.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn`, or `launcher=debug` when `verbose`.
///
/// # Example
/// ```bash
/// RUST_LOG=launcher=trace launcher run tool.py
/// ```
pub fn init(verbose: bool) {
    let default = if verbose { "launcher=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
