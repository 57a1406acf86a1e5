use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the API client, its pollers and the status surface.
pub struct MetricsRegistry {
    registry: Registry,

    // Outbound API Metrics
    pub api_requests_total: CounterVec,
    pub api_request_duration_seconds: HistogramVec,

    // Poller Metrics
    pub poller_ticks_total: CounterVec,
    pub poller_tick_duration_seconds: HistogramVec,
    pub poller_next_delay_seconds: GaugeVec,
    pub poller_running: GaugeVec,

    // Status Surface Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        // Outbound API Metrics
        let api_requests_total = CounterVec::new(
            Opts::new("api_requests_total", "Total requests sent to the server API")
                .namespace("gocd"),
            &["method", "endpoint", "outcome"],
        )?;
        registry.register(Box::new(api_requests_total.clone()))?;

        let api_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("api_request_duration_seconds", "Server API round-trip duration")
                .namespace("gocd")
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(api_request_duration_seconds.clone()))?;

        // Poller Metrics
        let poller_ticks_total = CounterVec::new(
            Opts::new("poller_ticks_total", "Poll operations run, by outcome")
                .namespace("gocd"),
            &["poller", "outcome"],
        )?;
        registry.register(Box::new(poller_ticks_total.clone()))?;

        let poller_tick_duration_seconds = HistogramVec::new(
            HistogramOpts::new("poller_tick_duration_seconds", "Duration of a single poll operation")
                .namespace("gocd")
                .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0]),
            &["poller"],
        )?;
        registry.register(Box::new(poller_tick_duration_seconds.clone()))?;

        let poller_next_delay_seconds = GaugeVec::new(
            Opts::new("poller_next_delay_seconds", "Delay until the next scheduled poll")
                .namespace("gocd"),
            &["poller"],
        )?;
        registry.register(Box::new(poller_next_delay_seconds.clone()))?;

        let poller_running = GaugeVec::new(
            Opts::new("poller_running", "1 while the poller has a live schedule")
                .namespace("gocd"),
            &["poller"],
        )?;
        registry.register(Box::new(poller_running.clone()))?;

        // Status Surface Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("watch_http_requests_total", "Requests served by the status surface")
                .namespace("gocd"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("watch_http_request_duration_seconds", "Status surface request duration")
                .namespace("gocd")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Arc::new(Self {
            registry,
            api_requests_total,
            api_request_duration_seconds,
            poller_ticks_total,
            poller_tick_duration_seconds,
            poller_next_delay_seconds,
            poller_running,
            http_requests_total,
            http_request_duration_seconds,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Get the underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
