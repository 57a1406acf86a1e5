use gocd_client::services::metrics::MetricsRegistry;
use serial_test::serial;

// =============================================================================
// INTEGRATION TESTS - METRICS REGISTRY
// =============================================================================

#[serial]
#[test]
fn test_metrics_registry_initialization() {
    let metrics = MetricsRegistry::new();
    assert!(metrics.is_ok(), "Failed to initialize metrics registry");
}

#[serial]
#[test]
fn test_registries_are_independent() {
    let first = MetricsRegistry::new().unwrap();
    let second = MetricsRegistry::new().unwrap();

    first
        .api_requests_total
        .with_label_values(&["GET", "/go/api/dashboard", "success"])
        .inc();

    assert!(first.export().unwrap().contains("gocd_api_requests_total"));
    assert!(!second.export().unwrap().contains("gocd_api_requests_total{"));
}

#[serial]
#[test]
fn test_surface_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .http_requests_total
        .with_label_values(&["GET", "/dashboard", "200"])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&["GET", "/dashboard"])
        .observe(0.002);

    let output = metrics.export().unwrap();
    assert!(output.contains("gocd_watch_http_requests_total"));
    assert!(output.contains("method=\"GET\""));
    assert!(output.contains("endpoint=\"/dashboard\""));
    assert!(output.contains("status=\"200\""));
    assert!(output.contains("gocd_watch_http_request_duration_seconds_bucket"));
}

#[serial]
#[test]
fn test_registry_gathers_all_families() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics.poller_running.with_label_values(&["dashboard"]).set(1.0);
    metrics
        .poller_ticks_total
        .with_label_values(&["dashboard", "success"])
        .inc();

    let names: Vec<String> = metrics
        .registry()
        .gather()
        .iter()
        .map(|family| family.get_name().to_string())
        .collect();
    assert!(names.contains(&"gocd_poller_running".to_string()));
    assert!(names.contains(&"gocd_poller_ticks_total".to_string()));
}
