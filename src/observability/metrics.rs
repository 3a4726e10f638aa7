//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devserver_requests_total` (counter): every request, by dispatch route
//! - `devserver_proxy_requests_total` (counter): proxy outcomes, by outcome and status
//! - `devserver_proxy_request_duration_seconds` (histogram): proxy latency, by outcome

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Route;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_dispatch(route: Route) {
    counter!("devserver_requests_total", "route" => route.as_str()).increment(1);
}

pub fn record_proxy(outcome: &'static str, status: StatusCode, start: Instant) {
    counter!(
        "devserver_proxy_requests_total",
        "outcome" => outcome,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    histogram!("devserver_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
