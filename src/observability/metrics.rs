//! Metrics collection and exposition.
//!
//! # Metrics
//! - `registry_http_requests_total` (counter): requests by method, route, status
//! - `registry_http_request_duration_seconds` (histogram): latency by route
//! - `registry_config_updates_total` (counter): installed configurations by provider
//! - `registry_snapshot_providers` (gauge): providers in the current snapshot
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "registry_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "registry_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_config_update(provider: &str) {
    counter!("registry_config_updates_total", "provider" => provider.to_string()).increment(1);
}

pub fn record_snapshot_providers(count: usize) {
    gauge!("registry_snapshot_providers").set(count as f64);
}
