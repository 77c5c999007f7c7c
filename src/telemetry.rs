//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber.
//! Logs go to stderr so they never interleave with console output on stdout.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Build the filter used when `RUST_LOG` is not set
fn default_filter(default_level: &str) -> String {
    format!("bedrock_console={}", default_level.to_ascii_lowercase())
}

/// Initialize tracing subscriber for structured logging
///
/// This can only be called once per process. Subsequent calls are silently ignored.
///
/// Reads log level from RUST_LOG environment variable, defaulting to the
/// level specified in config (or "warn" if not set).
///
/// # Examples
///
/// ```no_run
/// bedrock_console::telemetry::init("warn");
/// tracing::warn!("Console started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(default_level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    });
}
