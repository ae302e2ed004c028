//! Logging setup utilities for the donation relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary log at `default_log_level`
/// unless `RUST_LOG` says otherwise. `tower_http` is included so request
/// traces show up alongside application logs.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "donation-relay-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use donation_relay_shared::logger::setup_logger;
///
/// setup_logger("donation-relay-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Target of the server library crate
const LIBRARY_TARGET: &str = "donation_relay_server";

/// Filter directives for the library, the binary (if it is a separate
/// target) and `tower_http`, all at `default_log_level`
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");

    let mut targets = vec![LIBRARY_TARGET];
    if binary_target != LIBRARY_TARGET {
        targets.push(&binary_target);
    }
    targets.push("tower_http");

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
