use gocd_client::services::metrics::{collectors::*, MetricsRegistry};
use serial_test::serial;
use std::time::Duration;

// =============================================================================
// INTEGRATION TESTS - METRICS COLLECTORS
// =============================================================================

#[serial]
#[test]
fn test_api_collector_normalizes_endpoints() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = ApiMetricsCollector::new(metrics.clone());

    collector.record_request("GET", "/go/api/internal/build_cause/up42/17", "success", Duration::from_millis(40));
    collector.record_request("GET", "/go/api/internal/build_cause/up42/18", "error", Duration::from_millis(25));

    let output = metrics.export().unwrap();
    assert!(output.contains("endpoint=\"/go/api/internal/build_cause/up42/:id\""));
    assert!(output.contains("outcome=\"success\""));
    assert!(output.contains("outcome=\"error\""));
    assert!(!output.contains("/17"));
}

#[serial]
#[test]
fn test_poller_collector_tracks_outcomes() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = PollerMetricsCollector::new(metrics.clone());

    collector.record_tick("dashboard", true, Duration::from_millis(120));
    collector.record_tick("dashboard", false, Duration::from_millis(30));
    collector.record_tick("dashboard", false, Duration::from_millis(30));

    assert_eq!(
        metrics
            .poller_ticks_total
            .with_label_values(&["dashboard", "failure"])
            .get(),
        2.0
    );

    let output = metrics.export().unwrap();
    assert!(output.contains("gocd_poller_tick_duration_seconds"));
}

#[serial]
#[test]
fn test_poller_collector_gauges() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = PollerMetricsCollector::new(metrics.clone());

    collector.set_running("dashboard", true);
    collector.set_next_delay("dashboard", Duration::from_secs(40));

    let output = metrics.export().unwrap();
    assert!(output.contains("gocd_poller_running{poller=\"dashboard\"} 1"));
    assert!(output.contains("gocd_poller_next_delay_seconds{poller=\"dashboard\"} 40"));

    collector.set_running("dashboard", false);
    assert_eq!(metrics.poller_running.with_label_values(&["dashboard"]).get(), 0.0);
}
