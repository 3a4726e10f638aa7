//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Pick the filter: `RUST_LOG`, then the configured filter, then the default
//!
//! # Design Decisions
//! - Human-readable fmt output; this is a development server
//! - Per-request spans come from `tower_http::trace::TraceLayer`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `--log-filter` is set.
pub const DEFAULT_FILTER: &str = "wasm_devserver=info,tower_http=info";

/// Resolve the effective filter directive.
pub fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(configured: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(filter(configured))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
