//! Forwarding proxy subsystem.
//!
//! # Data Flow
//! ```text
//! GET /proxy/<url>
//!     → target.rs (strip prefix, parse, allow only http/https)   ── reject → 400
//!     → client.rs (one outbound GET, fixed User-Agent, deadline)
//!         ├─ 2xx            → handler.rs: 200 + body + CORS headers
//!         ├─ non-2xx        → error.rs: same status and reason
//!         └─ transport fault → error.rs: 502
//!     → security layer seals COOP/COEP
//!
//! OPTIONS /proxy/<url>
//!     → handler.rs: 204 + pre-flight CORS headers (target not inspected)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound attempt per request; no retries, no caching
//! - Idle upstream connections are not kept between requests
//! - The upstream body is relayed byte-for-byte

pub mod client;
pub mod error;
pub mod handler;
pub mod target;

pub use client::{ForwardProxy, UpstreamResponse};
pub use error::ProxyError;
pub use handler::{handle_proxy_get, handle_proxy_options};
pub use target::TargetUrl;
