use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gocd_client::config::Config;
use gocd_client::modules::dashboard::{DashboardCrud, DashboardWatcher};
use gocd_client::services::api::ApiClient;
use gocd_client::services::metrics::MetricsRegistry;
use gocd_client::services::poller::{ManualVisibility, Poller};
use gocd_client::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gocd_client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let metrics = MetricsRegistry::new()?;

    let client = ApiClient::new(config.base_url.clone(), config.request_timeout)?
        .with_auth(config.auth.clone())
        .with_metrics(metrics.clone());
    tracing::info!(base_url = %client.base_url(), "Watching GoCD server");

    let watcher = Arc::new(DashboardWatcher::new(DashboardCrud::new(
        client,
        config.dashboard_view.clone(),
    )));
    let visibility = Arc::new(ManualVisibility::new(false));

    let poller = Poller::new("dashboard", config.poller, watcher.clone(), visibility.clone())
        .with_metrics(metrics.clone());
    poller.start();

    let state = Arc::new(AppState {
        metrics,
        watcher,
        visibility,
        poller: poller.clone(),
    });
    let app = gocd_client::create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!("Status server running on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    poller.stop();
    tracing::info!("Shut down");
    Ok(())
}
