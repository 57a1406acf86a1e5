use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use super::crud::DashboardCrud;
use super::model::Dashboard;
use crate::services::api::ObjectWithEtag;
use crate::services::poller::{PollError, PollOperation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub dashboard: Dashboard,
    pub etag: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// What the watcher knows so far. `last_error` is cleared by the next good poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub snapshot: Option<DashboardSnapshot>,
    pub last_error: Option<String>,
    pub polls: u64,
    pub failures: u64,
}

/// Poll operation keeping the latest dashboard, refetching only when the etag changes.
pub struct DashboardWatcher {
    crud: DashboardCrud,
    state: watch::Sender<DashboardState>,
}

impl DashboardWatcher {
    pub fn new(crud: DashboardCrud) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self { crud, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    fn current_etag(&self) -> Option<String> {
        self.state
            .borrow()
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.etag.clone())
    }
}

#[async_trait]
impl PollOperation for DashboardWatcher {
    async fn poll(&self) -> Result<(), PollError> {
        let etag = self.current_etag();
        let result = self.crud.fetch(etag.as_deref()).await;

        if result.is_not_modified() {
            tracing::debug!("Dashboard unchanged");
            self.state.send_modify(|state| {
                state.polls += 1;
                state.last_error = None;
            });
            return Ok(());
        }

        match result.into_result() {
            Ok(ObjectWithEtag { object, etag }) => {
                tracing::debug!(
                    pipelines = object.pipelines().len(),
                    etag = etag.as_deref().unwrap_or(""),
                    "Dashboard updated"
                );
                self.state.send_modify(|state| {
                    state.polls += 1;
                    state.last_error = None;
                    state.snapshot = Some(DashboardSnapshot {
                        dashboard: object,
                        etag,
                        fetched_at: Utc::now(),
                    });
                });
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.state.send_modify(|state| {
                    state.polls += 1;
                    state.failures += 1;
                    state.last_error = Some(message);
                });
                Err(e.into())
            }
        }
    }
}
