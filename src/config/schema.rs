//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Port used when none is given on the command line.
pub const DEFAULT_PORT: u16 = 8090;

/// Reserved path prefix under which the forwarding proxy lives.
pub const DEFAULT_PROXY_PREFIX: &str = "/proxy/";

/// Outbound request deadline, in seconds.
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 15;

/// User-Agent sent on every outbound request.
pub const DEFAULT_USER_AGENT: &str = concat!("wasm-devserver/", env!("CARGO_PKG_VERSION"), " (proxy)");

/// Root configuration for the development server.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Static file serving.
    pub static_files: StaticConfig,

    /// Forwarding proxy settings.
    pub proxy: ProxyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Interface to bind. Defaults to all interfaces.
    pub bind_address: IpAddr,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    /// Directory that GET requests outside the proxy prefix are served from.
    pub root: PathBuf,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Forwarding proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Path prefix that marks a proxied request. Must start and end with `/`.
    pub prefix: String,

    /// Identifying User-Agent for outbound requests.
    pub user_agent: String,

    /// Total outbound request timeout in seconds.
    pub timeout_secs: u64,

    /// Route outbound requests through `HTTP(S)_PROXY` when set in the environment.
    pub use_system_proxy: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PROXY_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_PROXY_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }
}

/// Logging and metrics configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,

    /// Address for the Prometheus scrape endpoint. Disabled when `None`.
    pub metrics_address: Option<SocketAddr>,
}
