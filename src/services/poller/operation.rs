use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;

use crate::services::api::ApiError;

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Operation(String),
}

/// Unit of work run on every tick.
///
/// Errors are reported back to the poller for logging and metrics only; the
/// schedule continues regardless. Surface failures to users through your own
/// channel (see `DashboardWatcher`).
#[async_trait]
pub trait PollOperation: Send + Sync {
    async fn poll(&self) -> Result<(), PollError>;
}

/// Closure-backed operation, built with [`poll_fn`].
pub struct PollFn<F> {
    f: F,
}

/// Wrap an async closure as a [`PollOperation`].
pub fn poll_fn<F, Fut>(f: F) -> PollFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), PollError>> + Send + 'static,
{
    PollFn { f }
}

#[async_trait]
impl<F, Fut> PollOperation for PollFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), PollError>> + Send + 'static,
{
    async fn poll(&self) -> Result<(), PollError> {
        (self.f)().await
    }
}
