//! Prometheus-compatible metrics endpoint for the shelf server.
//!
//! Tracks request counts, raw-content fetches, and artifact writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Global metrics registry.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total HTTP requests served.
    pub http_requests_total: AtomicU64,
    /// Total HTTP errors (4xx + 5xx).
    pub http_errors_total: AtomicU64,
    /// Total raw-content fetches (scripts + compose files).
    pub raw_fetches_total: AtomicU64,
    /// Raw fetches that carried query parameters and ran the substitution engine.
    pub raw_substitutions_total: AtomicU64,
    /// Total artifact saves and renames.
    pub artifact_writes_total: AtomicU64,
    /// Server start time for uptime calculation.
    pub started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                http_requests_total: AtomicU64::new(0),
                http_errors_total: AtomicU64::new(0),
                raw_fetches_total: AtomicU64::new(0),
                raw_substitutions_total: AtomicU64::new(0),
                artifact_writes_total: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn inc_http_requests(&self) {
        self.inner
            .http_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_http_errors(&self) {
        self.inner.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_raw_fetches(&self) {
        self.inner.raw_fetches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_raw_substitutions(&self) {
        self.inner
            .raw_substitutions_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_artifact_writes(&self) {
        self.inner
            .artifact_writes_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let m = &self.inner;

        format!(
            r#"# HELP shelf_uptime_seconds Time since the server started.
# TYPE shelf_uptime_seconds gauge
shelf_uptime_seconds {}

# HELP shelf_http_requests_total Total HTTP requests served.
# TYPE shelf_http_requests_total counter
shelf_http_requests_total {}

# HELP shelf_http_errors_total Total HTTP errors (4xx/5xx).
# TYPE shelf_http_errors_total counter
shelf_http_errors_total {}

# HELP shelf_raw_fetches_total Total raw-content fetches.
# TYPE shelf_raw_fetches_total counter
shelf_raw_fetches_total {}

# HELP shelf_raw_substitutions_total Raw fetches that ran variable substitution.
# TYPE shelf_raw_substitutions_total counter
shelf_raw_substitutions_total {}

# HELP shelf_artifact_writes_total Total artifact saves and renames.
# TYPE shelf_artifact_writes_total counter
shelf_artifact_writes_total {}
"#,
            m.started_at.elapsed().as_secs(),
            m.http_requests_total.load(Ordering::Relaxed),
            m.http_errors_total.load(Ordering::Relaxed),
            m.raw_fetches_total.load(Ordering::Relaxed),
            m.raw_substitutions_total.load(Ordering::Relaxed),
            m.artifact_writes_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
