//! Target URL extraction and validation.
//!
//! The target is everything after the proxy prefix, query included, taken
//! from the request line without percent-decoding. The `url` parser then
//! normalises it the WHATWG way before it is sent: dot segments are resolved
//! and characters outside the path set (`{`, `}`, space, ...) are escaped.
//! Existing escapes, valid or not, are kept as they are.

use url::Url;

use crate::proxy::error::ProxyError;

/// Schemes the proxy is willing to fetch.
pub const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// A parsed upstream URL whose scheme is known to be http or https.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Extract the target from a request path-and-query mounted under `prefix`.
    pub fn from_request_path(path_and_query: &str, prefix: &str) -> Result<Self, ProxyError> {
        let raw = path_and_query.strip_prefix(prefix).ok_or_else(|| {
            ProxyError::InvalidTarget(format!("path does not start with {prefix}"))
        })?;
        Self::parse(raw)
    }

    /// Parse a raw target string.
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(raw)
            .map_err(|e| ProxyError::InvalidTarget(format!("{raw:?}: {e}")))?;

        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            return Err(ProxyError::InvalidTarget(format!(
                "scheme {:?} is not allowed",
                url.scheme()
            )));
        }

        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}
