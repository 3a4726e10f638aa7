//! Proxy request handlers.

use std::time::Instant;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::observability::metrics;
use crate::proxy::client::{ForwardProxy, UpstreamResponse};
use crate::proxy::error::ProxyError;
use crate::proxy::target::TargetUrl;
use crate::security::{cors_headers, preflight_headers};

/// Forward `GET <prefix><url>` to `<url>` and relay the result.
///
/// Always answers; every failure becomes an HTTP response.
pub async fn handle_proxy_get(proxy: &ForwardProxy, path_and_query: &str) -> Response {
    let start = Instant::now();

    let result = match TargetUrl::from_request_path(path_and_query, proxy.prefix()) {
        Ok(target) => {
            tracing::debug!(upstream = %target, "Forwarding request");
            proxy.fetch(&target).await.map(|upstream| (target, upstream))
        }
        Err(e) => Err(e),
    };

    match result {
        Ok((target, upstream)) => {
            tracing::info!(
                upstream = %target,
                bytes = upstream.body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Proxied"
            );
            metrics::record_proxy("ok", StatusCode::OK, start);
            relay(upstream)
        }
        Err(err) => {
            let status = err.status_code();
            match &err {
                ProxyError::InvalidTarget(detail) => {
                    tracing::warn!(path = %path_and_query, detail = %detail, "Rejected proxy target");
                }
                ProxyError::Upstream { .. } => {
                    tracing::info!(path = %path_and_query, status = %status, "Upstream error passed through");
                }
                transport => {
                    let cause = std::error::Error::source(transport)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    tracing::warn!(
                        path = %path_and_query,
                        error = %transport,
                        cause = %cause,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Proxy request failed"
                    );
                }
            }
            metrics::record_proxy(err.outcome(), status, start);
            err.into_response()
        }
    }
}

/// 200 with the upstream body untouched and the CORS headers attached.
fn relay(upstream: UpstreamResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, upstream.content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(upstream.body.len()));
    cors_headers(&mut headers);

    (StatusCode::OK, headers, upstream.body).into_response()
}

/// Answer a CORS pre-flight for any proxy path. The target is not inspected.
pub fn handle_proxy_options() -> Response {
    let mut headers = HeaderMap::new();
    preflight_headers(&mut headers);
    (StatusCode::NO_CONTENT, headers).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use axum::body::{to_bytes, Bytes};

    #[tokio::test]
    async fn test_relay_sets_length_and_cors() {
        let response = relay(UpstreamResponse {
            content_type: HeaderValue::from_static("application/json"),
            body: Bytes::from_static(b"{\"a\":1}"),
        });

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::CONTENT_LENGTH], "7");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_relay_keeps_binary_body() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let response = relay(UpstreamResponse {
            content_type: HeaderValue::from_static("image/png"),
            body: Bytes::from(payload.clone()),
        });

        assert_eq!(response.headers()[header::CONTENT_LENGTH], "4096");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.to_vec(), payload);
    }

    #[tokio::test]
    async fn test_options_is_204_without_body() {
        let response = handle_proxy_options();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_bad_scheme_never_leaves_the_process() {
        let proxy = ForwardProxy::new(&ProxyConfig::default()).unwrap();
        let response = handle_proxy_get(&proxy, "/proxy/ftp://example.com/file").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
