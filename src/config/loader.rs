//! Configuration loading from the command line.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    ListenerConfig, ObservabilityConfig, ProxyConfig, ServerConfig, StaticConfig, DEFAULT_PORT,
    DEFAULT_PROXY_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::config::validation::{validate_config, ValidationError};

/// Serve a WebAssembly build with cross-origin isolation headers and a CORS proxy.
#[derive(Debug, Parser)]
#[command(name = "wasm-devserver", version)]
#[command(
    about = "Serve a build directory with COOP/COEP headers and a same-origin CORS proxy",
    after_help = "The proxy accepts GET /proxy/<url>, e.g. /proxy/https://example.com/data.json"
)]
pub struct CliArgs {
    /// Directory to serve static files from.
    pub directory: PathBuf,

    /// TCP port to listen on.
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Outbound proxy request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_PROXY_TIMEOUT_SECS)]
    pub proxy_timeout: u64,

    /// User-Agent sent on outbound proxy requests.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Ignore HTTP_PROXY/HTTPS_PROXY for outbound requests.
    #[arg(long)]
    pub no_system_proxy: bool,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_address: Option<SocketAddr>,

    /// Log filter used when RUST_LOG is unset (e.g. "wasm_devserver=debug").
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<CliArgs> for ServerConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            listener: ListenerConfig {
                bind_address: args.bind,
                port: args.port,
            },
            static_files: StaticConfig {
                root: args.directory,
            },
            proxy: ProxyConfig {
                user_agent: args.user_agent,
                timeout_secs: args.proxy_timeout,
                use_system_proxy: !args.no_system_proxy,
                ..ProxyConfig::default()
            },
            observability: ObservabilityConfig {
                log_filter: args.log_filter,
                metrics_address: args.metrics_address,
            },
        }
    }
}

/// Build and validate configuration from parsed command-line arguments.
pub fn load_config(args: CliArgs) -> Result<ServerConfig, ConfigError> {
    let config = ServerConfig::from(args);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
