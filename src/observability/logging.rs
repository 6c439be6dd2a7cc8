//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the server binary
//! - Pick log level from `RUST_LOG`, falling back to config
//! - Switch between human-readable and JSON output
//!
//! # Design Decisions
//! - Library code under `exchange`, `content` and `session` never logs;
//!   only the server and its middleware emit events

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    let level = config.log_level.to_ascii_lowercase();
    format!("exchange_context={level},exchange_server={level},tower_http={level}")
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(config.json_logs.then(|| fmt::layer().json()))
        .with((!config.json_logs).then(|| fmt::layer()))
        .try_init();
}
