//! Tracing subscriber setup for the command-line tool.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// `RUST_LOG` takes precedence; otherwise `--quiet` drops to warnings
/// and `--debug` raises to debug-level output.
pub fn init(quiet: bool, debug: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(quiet, debug));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn default_filter(quiet: bool, debug: bool) -> EnvFilter {
    let level = if quiet {
        "warn"
    } else if debug {
        "debug"
    } else {
        "info"
    };
    EnvFilter::new(level)
}
