use std::sync::Arc;
use std::time::Duration;

use super::MetricsRegistry;

/// Collector for outbound API request metrics
#[derive(Clone)]
pub struct ApiMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl ApiMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_request(&self, method: &str, url: &str, outcome: &str, elapsed: Duration) {
        let endpoint = normalize_endpoint(url);

        self.metrics
            .api_requests_total
            .with_label_values(&[method, &endpoint, outcome])
            .inc();

        self.metrics
            .api_request_duration_seconds
            .with_label_values(&[method, &endpoint])
            .observe(elapsed.as_secs_f64());
    }
}

/// Collector for poller metrics
#[derive(Clone)]
pub struct PollerMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl PollerMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_tick(&self, poller: &str, success: bool, elapsed: Duration) {
        let outcome = if success { "success" } else { "failure" };

        self.metrics
            .poller_ticks_total
            .with_label_values(&[poller, outcome])
            .inc();

        self.metrics
            .poller_tick_duration_seconds
            .with_label_values(&[poller])
            .observe(elapsed.as_secs_f64());
    }

    pub fn set_next_delay(&self, poller: &str, delay: Duration) {
        self.metrics
            .poller_next_delay_seconds
            .with_label_values(&[poller])
            .set(delay.as_secs_f64());
    }

    pub fn set_running(&self, poller: &str, running: bool) {
        self.metrics
            .poller_running
            .with_label_values(&[poller])
            .set(if running { 1.0 } else { 0.0 });
    }
}

/// Collector for requests served by the status surface
#[derive(Clone)]
pub struct HttpMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl HttpMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    /// `endpoint` is a route template such as `/dashboard`, never a raw path.
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        self.metrics
            .http_requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();

        self.metrics
            .http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(elapsed.as_secs_f64());
    }
}

/// Normalize an API path to keep label cardinality bounded.
/// Drops the query string and collapses id-like segments:
/// `/go/api/internal/build_cause/up42/17?x=1` -> `/go/api/internal/build_cause/up42/:id`
pub fn normalize_endpoint(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let path = match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => path,
    };

    let normalized: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| if is_id_like(segment) { ":id" } else { segment })
        .collect();

    format!("/{}", normalized.join("/"))
}

/// Check if a segment looks like an ID
fn is_id_like(segment: &str) -> bool {
    // UUID pattern
    if segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4 {
        return true;
    }

    // All digits (counters)
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    // Hex hash (40+ chars)
    if segment.len() >= 40 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }

    false
}
