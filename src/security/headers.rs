//! Response header contract.
//!
//! Every response leaving the server carries
//! `Cross-Origin-Opener-Policy: same-origin` and
//! `Cross-Origin-Embedder-Policy: require-corp`, which browsers require before
//! they expose `SharedArrayBuffer` and friends to a page.
//!
//! The layers installed by [`apply_isolation_headers`] wrap the whole router,
//! fallback and error paths included, and run after every handler has set its
//! own headers. They override, so a handler cannot drop or replace either value.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

pub const COOP_SAME_ORIGIN: HeaderValue = HeaderValue::from_static("same-origin");
pub const COEP_REQUIRE_CORP: HeaderValue = HeaderValue::from_static("require-corp");

pub const ALLOW_ANY_ORIGIN: HeaderValue = HeaderValue::from_static("*");
pub const ALLOWED_METHODS: HeaderValue = HeaderValue::from_static("GET, OPTIONS");
pub const ALLOW_ANY_HEADERS: HeaderValue = HeaderValue::from_static("*");

/// Seal the cross-origin isolation headers onto every response of `router`.
pub fn apply_isolation_headers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_EMBEDDER_POLICY,
            COEP_REQUIRE_CORP,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_OPENER_POLICY,
            COOP_SAME_ORIGIN,
        ))
}

/// CORS headers attached to successful proxy responses.
pub fn cors_headers(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ANY_ORIGIN);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS);
}

/// CORS headers for a pre-flight answer.
pub fn preflight_headers(headers: &mut HeaderMap) {
    cors_headers(headers);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_ANY_HEADERS);
}
