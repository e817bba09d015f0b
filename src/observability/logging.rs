//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber for binaries
//! - Resolve the log filter from `RUST_LOG`, config, or the built-in default
//!
//! # Design Decisions
//! - `RUST_LOG` always wins so operators can override a shipped config
//! - Library code only emits events; installing a subscriber is the binary's job

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when neither `RUST_LOG` nor the config name one.
pub const DEFAULT_FILTER: &str = "stock_web_shell=debug,tower_http=debug";

/// Pick the filter directive to use.
pub fn filter_directive(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log_level
            .as_deref()
            .unwrap_or(DEFAULT_FILTER)
            .into()
    })
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_directive(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
