//! Request statistics served by `/health`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use serde::Serialize;

use crate::observability::metrics;

/// Cumulative counters for every response the server has produced.
#[derive(Debug)]
pub struct RequestStats {
    started: Instant,
    total_count: AtomicU64,
    total_response_nanos: AtomicU64,
    status_codes: DashMap<u16, u64>,
}

/// Point-in-time rendering of [`RequestStats`].
#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    pub pid: u32,
    pub uptime: String,
    pub uptime_sec: f64,
    pub unixtime: u64,
    pub total_count: u64,
    pub total_status_code_count: BTreeMap<String, u64>,
    pub total_response_time: String,
    pub total_response_time_sec: f64,
    pub average_response_time: String,
    pub average_response_time_sec: f64,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            total_count: AtomicU64::new(0),
            total_response_nanos: AtomicU64::new(0),
            status_codes: DashMap::new(),
        }
    }

    /// Record one finished response.
    pub fn record(&self, status: u16, elapsed: Duration) {
        self.total_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_response_nanos.fetch_add(nanos, Ordering::Relaxed);
        *self.status_codes.entry(status).or_insert(0) += 1;
    }

    pub fn data(&self) -> StatsData {
        let uptime = self.started.elapsed();
        let total_count = self.total_count.load(Ordering::Relaxed);
        let total_response = Duration::from_nanos(self.total_response_nanos.load(Ordering::Relaxed));
        let average_response = if total_count == 0 {
            Duration::ZERO
        } else {
            total_response / u32::try_from(total_count).unwrap_or(u32::MAX)
        };

        let total_status_code_count = self
            .status_codes
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect();

        StatsData {
            pid: std::process::id(),
            uptime: format!("{uptime:?}"),
            uptime_sec: uptime.as_secs_f64(),
            unixtime: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            total_count,
            total_status_code_count,
            total_response_time: format!("{total_response:?}"),
            total_response_time_sec: total_response.as_secs_f64(),
            average_response_time: format!("{average_response:?}"),
            average_response_time_sec: average_response.as_secs_f64(),
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware feeding [`RequestStats`] and the Prometheus recorder.
pub async fn track_requests(
    State(stats): State<Arc<RequestStats>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    stats.record(status, start.elapsed());
    metrics::record_request(&method, status, &route, start);
    response
}
