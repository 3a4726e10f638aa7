//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Issue one GET per proxied request with the configured User-Agent
//! - Enforce the outbound deadline (connect + headers + body)
//! - Turn the upstream reply into an [`UpstreamResponse`] or a [`ProxyError`]
//!
//! # Design Decisions
//! - `pool_max_idle_per_host(0)`: no upstream connection outlives its request
//! - Redirects are followed; only the final status is inspected
//! - Any non-2xx final status is an upstream error, not a success

use std::time::Duration;

use axum::http::{header, HeaderValue};
use axum::body::Bytes;

use crate::config::ProxyConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::target::TargetUrl;

/// Content type reported when the upstream did not send one.
pub const FALLBACK_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/octet-stream");

/// A fully-read successful upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub content_type: HeaderValue,
    pub body: Bytes,
}

/// Issues outbound requests on behalf of the browser client.
#[derive(Debug, Clone)]
pub struct ForwardProxy {
    client: reqwest::Client,
    user_agent: HeaderValue,
    prefix: String,
}

impl ForwardProxy {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(0);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        // Validation already rejected values that are not legal header text.
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(crate::config::schema::DEFAULT_USER_AGENT));

        Ok(Self {
            client: builder.build()?,
            user_agent,
            prefix: config.prefix.clone(),
        })
    }

    /// Reserved path prefix this proxy is mounted under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fetch `target` once and read the whole body.
    pub async fn fetch(&self, target: &TargetUrl) -> Result<UpstreamResponse, ProxyError> {
        let response = self
            .client
            .get(target.as_url().clone())
            .header(header::USER_AGENT, self.user_agent.clone())
            .send()
            .await
            .map_err(ProxyError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::upstream(status, response.extensions()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        let body = response.bytes().await.map_err(ProxyError::from_transport)?;

        tracing::debug!(
            upstream = %target,
            upstream_status = %status,
            bytes = body.len(),
            "Upstream response read"
        );

        Ok(UpstreamResponse { content_type, body })
    }
}
