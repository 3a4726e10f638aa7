//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered (matcher, route) table
//! - Look up the route for a request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; the table has five rows
//! - Explicit variants for rejection rather than silent defaults

use axum::http::Method;

use crate::routing::matcher::{AndMatcher, AnyRequest, Matcher, MethodMatcher, PathPrefixMatcher};

/// What to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward the embedded target URL upstream.
    ProxyGet,
    /// Answer a CORS pre-flight for the proxy.
    ProxyPreflight,
    /// Hand the request to the static file service.
    Static,
    /// 405: OPTIONS outside the proxy prefix.
    MethodNotAllowed,
    /// 501: a verb nothing here implements.
    NotImplemented,
}

impl Route {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::ProxyGet => "proxy_get",
            Route::ProxyPreflight => "proxy_preflight",
            Route::Static => "static",
            Route::MethodNotAllowed => "method_not_allowed",
            Route::NotImplemented => "not_implemented",
        }
    }
}

#[derive(Debug)]
struct Entry {
    matcher: Box<dyn Matcher>,
    route: Route,
}

/// Table-driven request dispatcher.
#[derive(Debug)]
pub struct Dispatcher {
    entries: Vec<Entry>,
}

impl Dispatcher {
    /// Build the dispatch table for a proxy mounted at `prefix`.
    pub fn new(prefix: &str) -> Self {
        let under_prefix = |method: Method| -> Box<dyn Matcher> {
            Box::new(AndMatcher::new(vec![
                Box::new(MethodMatcher::only(method)),
                Box::new(PathPrefixMatcher::new(prefix)),
            ]))
        };

        let entries = vec![
            Entry {
                matcher: under_prefix(Method::GET),
                route: Route::ProxyGet,
            },
            Entry {
                matcher: under_prefix(Method::OPTIONS),
                route: Route::ProxyPreflight,
            },
            Entry {
                matcher: Box::new(MethodMatcher::only(Method::OPTIONS)),
                route: Route::MethodNotAllowed,
            },
            Entry {
                matcher: Box::new(MethodMatcher::new([Method::GET, Method::HEAD])),
                route: Route::Static,
            },
            Entry {
                matcher: Box::new(AnyRequest),
                route: Route::NotImplemented,
            },
        ];

        tracing::debug!(prefix = %prefix, rows = entries.len(), "Dispatch table built");

        Self { entries }
    }

    /// Return the route of the first row matching `method` and `path`.
    pub fn dispatch(&self, method: &Method, path: &str) -> Route {
        self.entries
            .iter()
            .find(|entry| entry.matcher.matches(method, path))
            .map(|entry| entry.route)
            .unwrap_or(Route::NotImplemented)
    }
}
