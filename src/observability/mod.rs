//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (only when --metrics-address is given)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) flows through the per-request span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
