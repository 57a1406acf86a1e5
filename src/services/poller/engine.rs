use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::config::PollerConfig;
use super::operation::PollOperation;
use super::visibility::{ListenerId, PageVisibilitySource};
use crate::services::metrics::{MetricsRegistry, PollerMetricsCollector};

/// Runs a [`PollOperation`] on a repeating, visibility-aware schedule.
///
/// Cloning is cheap and every clone controls the same schedule. The spawned
/// task is aborted when the last clone is dropped.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    name: String,
    config: PollerConfig,
    operation: Arc<dyn PollOperation>,
    visibility: Arc<dyn PageVisibilitySource>,
    metrics: OnceLock<PollerMetricsCollector>,
    task: Mutex<Option<JoinHandle<()>>>,
    runtime: Mutex<Option<Handle>>,
    subscription: Mutex<Option<ListenerId>>,
}

impl Poller {
    pub fn new(
        name: impl Into<String>,
        config: PollerConfig,
        operation: Arc<dyn PollOperation>,
        visibility: Arc<dyn PageVisibilitySource>,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                name: name.into(),
                config,
                operation,
                visibility,
                metrics: OnceLock::new(),
                task: Mutex::new(None),
                runtime: Mutex::new(None),
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Record ticks and schedule state. Only the first registry given is used.
    pub fn with_metrics(self, metrics: Arc<MetricsRegistry>) -> Self {
        let _ = self.inner.metrics.set(PollerMetricsCollector::new(metrics));
        self
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    pub fn is_running(&self) -> bool {
        is_live(&self.inner.task.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Schedule the first poll after the initial delay. No-op while running.
    pub fn start(&self) {
        self.subscribe_to_visibility();

        let mut task = self.inner.task.lock().unwrap_or_else(PoisonError::into_inner);
        if is_live(&task) {
            tracing::debug!(poller = %self.inner.name, "Poller already running");
            return;
        }

        if self.spawn_schedule(&mut task) {
            tracing::info!(
                poller = %self.inner.name,
                interval_secs = self.inner.config.interval_secs,
                initial_delay_secs = self.inner.config.initial_delay_secs,
                "Poller started"
            );
        }
    }

    /// Cancel the pending timer and any in-flight operation. Safe to repeat.
    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Restart only if a schedule is live, checked and replaced under one lock
    /// so a concurrent `stop` is never undone.
    fn restart_if_running(&self) -> bool {
        let mut task = self.inner.task.lock().unwrap_or_else(PoisonError::into_inner);
        if !is_live(&task) {
            return false;
        }
        if let Some(old) = task.take() {
            old.abort();
        }
        self.spawn_schedule(&mut task)
    }

    // Caller holds the task lock.
    fn spawn_schedule(&self, task: &mut Option<JoinHandle<()>>) -> bool {
        let Some(runtime) = self.runtime_handle() else {
            tracing::error!(poller = %self.inner.name, "Cannot start poller outside a Tokio runtime");
            return false;
        };

        let metrics = self.inner.metrics.get().cloned();
        let schedule = run_schedule(
            self.inner.name.clone(),
            self.inner.config,
            self.inner.operation.clone(),
            self.inner.visibility.clone(),
            metrics.clone(),
        );
        *task = Some(runtime.spawn(schedule));

        if let Some(metrics) = &metrics {
            metrics.set_running(&self.inner.name, true);
        }
        true
    }

    fn runtime_handle(&self) -> Option<Handle> {
        let mut runtime = self.inner.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(current) = Handle::try_current() {
            *runtime = Some(current);
        }
        runtime.clone()
    }

    fn subscribe_to_visibility(&self) {
        let mut subscription = self.inner.subscription.lock().unwrap_or_else(PoisonError::into_inner);
        if subscription.is_some() {
            return;
        }

        let weak: Weak<PollerInner> = Arc::downgrade(&self.inner);
        let id = self.inner.visibility.on_change(Arc::new(move |hidden| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let poller = Poller { inner };
            if poller.restart_if_running() {
                tracing::debug!(poller = %poller.name(), hidden, "Visibility changed, poller restarted");
            }
        }));
        *subscription = Some(id);
    }
}

fn is_live(task: &Option<JoinHandle<()>>) -> bool {
    task.as_ref().is_some_and(|t| !t.is_finished())
}

impl PollerInner {
    fn stop(&self) {
        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            task.abort();
            tracing::info!(poller = %self.name, "Poller stopped");
        }
        if let Some(metrics) = self.metrics.get() {
            metrics.set_running(&self.name, false);
        }
    }
}

impl Drop for PollerInner {
    fn drop(&mut self) {
        self.stop();
        let subscription = self.subscription.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(id) = subscription {
            self.visibility.remove_listener(id);
        }
    }
}

async fn run_schedule(
    name: String,
    config: PollerConfig,
    operation: Arc<dyn PollOperation>,
    visibility: Arc<dyn PageVisibilitySource>,
    metrics: Option<PollerMetricsCollector>,
) {
    tokio::time::sleep(config.initial_delay()).await;

    loop {
        let started = Instant::now();
        let result = operation.poll().await;
        let elapsed = started.elapsed();

        match &result {
            Ok(()) => tracing::debug!(poller = %name, elapsed_ms = elapsed.as_millis() as u64, "Poll succeeded"),
            Err(e) => tracing::warn!(poller = %name, error = %e, "Poll failed"),
        }

        let hidden = visibility.is_hidden();
        let delay = config.delay_for(hidden);

        if let Some(metrics) = &metrics {
            metrics.record_tick(&name, result.is_ok(), elapsed);
            metrics.set_next_delay(&name, delay);
        }

        tokio::time::sleep(delay).await;
    }
}
