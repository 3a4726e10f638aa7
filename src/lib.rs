//! Development server for cross-origin-isolated WebAssembly builds.
//!
//! Serves a build directory with the COOP/COEP headers browsers require for
//! `SharedArrayBuffer`, and forwards `GET /proxy/<url>` to `<url>` so the page
//! can reach third-party APIs that send no CORS headers of their own.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod security;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
