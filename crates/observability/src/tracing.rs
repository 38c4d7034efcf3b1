//! Tracing/logging initialization.
//!
//! JSON lines on stderr, filtered by `RUST_LOG` and falling back to the
//! configured default filter.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the default filter parses.
const FALLBACK_FILTER: &str = "info";

/// Build the filter: `RUST_LOG` first, then `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    // Stdout carries operation results, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .json()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
