pub mod collectors;
pub mod middleware;
pub mod registry;

pub use collectors::{ApiMetricsCollector, HttpMetricsCollector, PollerMetricsCollector};
pub use middleware::{metrics_middleware, UNMATCHED_ENDPOINT};
pub use registry::MetricsRegistry;
