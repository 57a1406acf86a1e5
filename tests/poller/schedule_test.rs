// =============================================================================
// INTEGRATION TESTS - POLLER SCHEDULE
// Timing properties checked on a paused clock
// =============================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use gocd_client::services::poller::{
    poll_fn, AlwaysVisible, ManualVisibility, PageVisibilitySource, PollError, PollOperation,
    Poller, PollerConfig,
};

type Ticks = Arc<Mutex<Vec<Instant>>>;

fn recorder(ticks: Ticks, fail: bool) -> Arc<dyn PollOperation> {
    Arc::new(poll_fn(move || {
        let ticks = ticks.clone();
        async move {
            ticks.lock().unwrap().push(Instant::now());
            if fail {
                Err(PollError::Operation("unreachable".to_string()))
            } else {
                Ok(())
            }
        }
    }))
}

fn gaps(ticks: &Ticks) -> Vec<Duration> {
    let ticks = ticks.lock().unwrap();
    ticks.windows(2).map(|w| w[1] - w[0]).collect()
}

async fn run_for(
    config: PollerConfig,
    visibility: Arc<dyn PageVisibilitySource>,
    fail: bool,
    total: Duration,
) -> Ticks {
    let ticks: Ticks = Arc::default();
    let poller = Poller::new("property", config, recorder(ticks.clone(), fail), visibility);
    poller.start();
    tokio::time::sleep(total).await;
    poller.stop();
    ticks
}

#[tokio::test(start_paused = true)]
async fn test_visible_gaps_are_at_least_interval() {
    for interval in [1u64, 3, 10, 60] {
        let config = PollerConfig::new(interval, 0, 4.0);
        let ticks = run_for(config, Arc::new(AlwaysVisible), false, Duration::from_millis(interval * 5500)).await;

        let gaps = gaps(&ticks);
        assert_eq!(gaps.len(), 5, "interval {}", interval);
        for gap in gaps {
            assert!(gap >= Duration::from_secs(interval), "gap {:?} for interval {}", gap, interval);
            assert!(gap < Duration::from_secs(interval + 1));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_hidden_gaps_are_interval_times_factor() {
    for (interval, factor) in [(1u64, 1.0f64), (2, 4.0), (5, 2.5), (10, 4.0)] {
        let config = PollerConfig::new(interval, 0, factor);
        let expected = Duration::from_secs(interval).mul_f64(factor);
        let ticks = run_for(
            config,
            Arc::new(ManualVisibility::new(true)),
            false,
            expected * 4 + expected / 2,
        )
        .await;

        let gaps = gaps(&ticks);
        assert_eq!(gaps.len(), 4);
        for gap in gaps {
            assert!(gap >= expected, "gap {:?} expected {:?}", gap, expected);
            assert!(gap < expected + Duration::from_secs(1));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_jitter_keeps_gaps_within_bounds() {
    let config = PollerConfig {
        jitter_factor: 0.25,
        ..PollerConfig::new(8, 0, 2.0)
    };
    let ticks = run_for(config, Arc::new(ManualVisibility::new(true)), false, Duration::from_secs(200)).await;

    let gaps = gaps(&ticks);
    assert!(gaps.len() >= 9);
    for gap in gaps {
        assert!(gap >= Duration::from_secs(16));
        assert!(gap <= Duration::from_secs(20));
    }
}

#[tokio::test(start_paused = true)]
async fn test_failing_operation_keeps_schedule() {
    let ticks = run_for(
        PollerConfig::new(2, 0, 4.0),
        Arc::new(AlwaysVisible),
        true,
        Duration::from_secs(11),
    )
    .await;

    assert_eq!(ticks.lock().unwrap().len(), 6);
    assert!(gaps(&ticks).iter().all(|g| *g == Duration::from_secs(2)));
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_start_resumes_after_initial_delay() {
    let ticks: Ticks = Arc::default();
    let start = Instant::now();
    let poller = Poller::new(
        "resume",
        PollerConfig::new(10, 2, 4.0),
        recorder(ticks.clone(), false),
        Arc::new(AlwaysVisible),
    );

    poller.start();
    tokio::time::sleep(Duration::from_secs(5)).await;
    poller.stop();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ticks.lock().unwrap().len(), 1);

    poller.start();
    tokio::time::sleep(Duration::from_secs(3)).await;

    let offsets: Vec<u64> = ticks
        .lock()
        .unwrap()
        .iter()
        .map(|t| (*t - start).as_secs())
        .collect();
    assert_eq!(offsets, vec![2, 37]);
}

#[tokio::test(start_paused = true)]
async fn test_restart_never_double_fires() {
    let ticks: Ticks = Arc::default();
    let visibility = Arc::new(ManualVisibility::new(false));
    let poller = Poller::new(
        "flapping",
        PollerConfig::new(10, 1, 4.0),
        recorder(ticks.clone(), false),
        visibility.clone(),
    );

    poller.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    for _ in 0..10 {
        visibility.set_hidden(true);
        visibility.set_hidden(false);
        poller.restart();
    }
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Every restart cancelled the pending first tick, so only the last one ran.
    assert_eq!(ticks.lock().unwrap().len(), 1);
    assert!(poller.is_running());
}
