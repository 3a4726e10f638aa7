//! Proxy failure taxonomy and its mapping onto HTTP responses.
//!
//! | Variant         | Status               | Body                               |
//! |-----------------|----------------------|------------------------------------|
//! | `InvalidTarget` | 400                  | `Only http/https targets allowed`  |
//! | `Upstream`      | upstream's own       | upstream's reason phrase           |
//! | everything else | 502                  | `Proxy error: <short description>` |
//!
//! The body text is also sent as the status-line reason phrase whenever it
//! differs from the canonical one.
//!
//! Transport details are logged by the handler; the client only sees the
//! short description.

use axum::http::{Extensions, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::ext::ReasonPhrase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid proxy target: {0}")]
    InvalidTarget(String),

    #[error("upstream responded {} {reason}", .status.as_u16())]
    Upstream { status: StatusCode, reason: String },

    #[error("upstream timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("could not connect to upstream")]
    Connect(#[source] reqwest::Error),

    #[error("failed to read upstream body")]
    Body(#[source] reqwest::Error),

    #[error("upstream request failed")]
    Request(#[source] reqwest::Error),
}

impl ProxyError {
    /// Classify a transport-level client error.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout(err)
        } else if err.is_connect() {
            ProxyError::Connect(err)
        } else if err.is_body() || err.is_decode() {
            ProxyError::Body(err)
        } else {
            ProxyError::Request(err)
        }
    }

    /// Build an upstream error from a non-success status.
    ///
    /// Keeps the upstream's literal reason phrase when it sent a non-standard
    /// one, otherwise uses the canonical phrase for the code.
    pub fn upstream(status: StatusCode, extensions: &Extensions) -> Self {
        let reason = extensions
            .get::<ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| "Upstream Error".to_owned());
        ProxyError::Upstream { status, reason }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget(_) => "invalid_target",
            ProxyError::Upstream { .. } => "upstream_error",
            ProxyError::Timeout(_) => "timeout",
            ProxyError::Connect(_) => "connect_error",
            ProxyError::Body(_) | ProxyError::Request(_) => "transport_error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ProxyError::InvalidTarget(_) => "Only http/https targets allowed".to_owned(),
            ProxyError::Upstream { reason, .. } => reason,
            other => format!("Proxy error: {other}"),
        };

        // The message doubles as the status-line reason phrase.
        let phrase = (status.canonical_reason() != Some(message.as_str()))
            .then(|| ReasonPhrase::try_from(message.as_bytes()).ok())
            .flatten();
        let mut response = (status, message).into_response();
        if let Some(phrase) = phrase {
            response.extensions_mut().insert(phrase);
        }
        response
    }
}
