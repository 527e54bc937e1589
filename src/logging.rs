//! Tracing setup for the command-line front end.
//!
//! Configure via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - every failed evaluation and note rescan
//! - `RUST_LOG=textcalc::config=info` - module-level filtering
//!
//! Logs go to stderr so that stdout carries only results.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Defaults to `warn` when `RUST_LOG` is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
