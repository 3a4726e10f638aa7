//! Configuration validation.
//!
//! # Responsibilities
//! - Check that the static root exists and is a directory
//! - Validate value ranges (timeout > 0) and prefix shape
//! - Reject a User-Agent that cannot be sent as a header
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Directory '{}' not found", .0.display())]
    StaticRootMissing(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    StaticRootNotDirectory(PathBuf),

    #[error("proxy prefix '{0}' must start and end with '/'")]
    InvalidProxyPrefix(String),

    #[error("proxy timeout must be greater than zero")]
    ZeroTimeout,

    #[error("user agent '{0}' is not a valid header value")]
    InvalidUserAgent(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let root = &config.static_files.root;
    if !root.exists() {
        errors.push(ValidationError::StaticRootMissing(root.clone()));
    } else if !root.is_dir() {
        errors.push(ValidationError::StaticRootNotDirectory(root.clone()));
    }

    let prefix = &config.proxy.prefix;
    if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::InvalidProxyPrefix(prefix.clone()));
    }

    if config.proxy.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if HeaderValue::from_str(&config.proxy.user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent(config.proxy.user_agent.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
