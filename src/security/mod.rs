//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response (static, proxied, pre-flight or error):
//!     → headers.rs (seal COOP/COEP, outermost layer)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - One place seals the isolation headers; handlers never set them
//! - CORS values used by the proxy live next to them so the header contract reads in one file

pub mod headers;

pub use headers::{apply_isolation_headers, cors_headers, preflight_headers};
