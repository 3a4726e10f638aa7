//! Canned responses for requests no handler accepts.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// 405 for OPTIONS outside the proxy prefix.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("GET, HEAD"))],
        "Method Not Allowed",
    )
        .into_response()
}

/// 501 for verbs the server does not implement at all.
pub fn not_implemented(method: &Method) -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ({method})"),
    )
        .into_response()
}
