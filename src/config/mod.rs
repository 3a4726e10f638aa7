//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → loader.rs (clap arguments → ServerConfig)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed by value to the HTTP server at construction
//! ```
//!
//! # Design Decisions
//! - No config file and no environment variables; the command line is the only input
//! - All fields have defaults so tests can build a config in one line
//! - Validation runs before any socket is bound

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, CliArgs, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, ProxyConfig, ServerConfig, StaticConfig};
pub use validation::{validate_config, ValidationError};
