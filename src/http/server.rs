//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatching handler
//! - Wire up middleware (request ID, tracing, isolation headers)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::static_files::StaticFiles;
use crate::http::{request, response};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::proxy::{handle_proxy_get, handle_proxy_options, ForwardProxy};
use crate::routing::{Dispatcher, Route};
use crate::security;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub proxy: ForwardProxy,
    pub static_files: StaticFiles,
}

/// HTTP server: static files plus the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(&config.proxy.prefix)),
            proxy: ForwardProxy::new(&config.proxy)?,
            static_files: StaticFiles::new(&config.static_files.root),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every method and path lands in [`dispatch`]; the isolation headers are
    /// applied last so they wrap everything, tracing and request-ID included.
    fn build_router(state: AppState) -> Router {
        let router = Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(request::propagate_request_id_layer())
            .layer(request::trace_layer())
            .layer(request::set_request_id_layer());

        security::apply_isolation_headers(router)
    }

    /// The fully layered router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route a request through the dispatch table.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let route = state.dispatcher.dispatch(request.method(), &path);
    metrics::record_dispatch(route);
    tracing::debug!(route = route.as_str(), path = %path, "Dispatched");

    match route {
        Route::ProxyGet => handle_proxy_get(&state.proxy, &path).await,
        Route::ProxyPreflight => handle_proxy_options(),
        Route::Static => state.static_files.serve(request).await,
        Route::MethodNotAllowed => response::method_not_allowed(),
        Route::NotImplemented => response::not_implemented(request.method()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{header, Method, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ServerConfig::default();
        config.static_files.root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        HttpServer::new(config).unwrap()
    }

    async fn send(method: Method, uri: &str) -> Response {
        server()
            .router()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn assert_isolated(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers.get_all("cross-origin-opener-policy").iter().count(), 1);
        assert_eq!(headers.get_all("cross-origin-embedder-policy").iter().count(), 1);
        assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
        assert_eq!(headers["cross-origin-embedder-policy"], "require-corp");
    }

    #[tokio::test]
    async fn test_static_file_served_with_isolation_headers() {
        let response = send(Method::GET, "/Cargo.toml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_isolated(&response);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let expected = std::fs::read(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")).unwrap();
        assert_eq!(body.to_vec(), expected);
    }

    #[tokio::test]
    async fn test_missing_static_file_still_isolated() {
        let response = send(Method::GET, "/does-not-exist.wasm").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_preflight() {
        let response = send(Method::OPTIONS, "/proxy/https://example.com/").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_options_outside_prefix_is_405() {
        let response = send(Method::OPTIONS, "/index.html").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_invalid_scheme_is_400() {
        let response = send(Method::GET, "/proxy/ftp://example.com/file").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_post_is_501() {
        let response = send(Method::POST, "/proxy/https://example.com/").await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let response = send(Method::GET, "/Cargo.toml").await;
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));
    }
}
