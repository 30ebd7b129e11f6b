//! Logging setup utilities for Duet binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Both the application crate and `tower_http` (request tracing) log at the
/// given level; everything else stays at the subscriber default.
pub fn default_directive(crate_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The crate whose events should be shown (e.g., `env!("CARGO_CRATE_NAME")`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use duet_shared::logger::setup_logger;
///
/// setup_logger("duet_server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(crate_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
