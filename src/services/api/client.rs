use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::ApiError;
use super::request::{ApiRequest, ApiRequestBuilder};
use super::response::ApiResult;
use crate::services::metrics::{ApiMetricsCollector, MetricsRegistry};

/// Credentials attached to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApiAuth {
    Basic { username: String, password: String },
    Bearer { token: String },
}

/// Thin transport over `reqwest`: one request, one `ApiResult`, no retries.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    // Always ends in '/', so joins keep any context path
    base: Url,
    auth: Option<ApiAuth>,
    metrics: Option<ApiMetricsCollector>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let mut base = parse_base_url(&base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            base,
            auth: None,
            metrics: None,
        })
    }

    pub fn with_auth(mut self, auth: Option<ApiAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(ApiMetricsCollector::new(metrics));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a route; absolute inputs pass through. Routes are
    /// resolved under the base path, so `/go/api/x` on `https://ci/gocd`
    /// becomes `https://ci/gocd/go/api/x`.
    pub fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }
        self.base
            .join(url.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidUrl(url.to_string()))
    }

    /// Build and send in one step. A request that cannot be built never hits
    /// the network and comes back as a status-0 failure.
    pub async fn send(&self, builder: ApiRequestBuilder) -> ApiResult<String> {
        match builder.build() {
            Ok(request) => self.execute(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Refusing to send malformed request");
                ApiResult::transport_failure(&e.to_string())
            }
        }
    }

    pub async fn execute(&self, request: ApiRequest) -> ApiResult<String> {
        let method = request.method.clone();
        let url = match self.resolve(&request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%method, url = %request.url, "Refusing to send to an unresolvable URL");
                return ApiResult::transport_failure(&e.to_string());
            }
        };
        let start = Instant::now();

        let mut outgoing = self
            .client
            .request(request.method, url.clone())
            .headers(request.headers);

        if let Some(body) = request.body {
            outgoing = outgoing.body(body);
        }

        if let Some(auth) = &self.auth {
            outgoing = match auth {
                ApiAuth::Basic { username, password } => outgoing.basic_auth(username, Some(password)),
                ApiAuth::Bearer { token } => outgoing.bearer_auth(token),
            };
        }

        let result = match outgoing.send().await {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                let status_text = status.canonical_reason().unwrap_or("Unknown Status").to_string();
                match response.text().await {
                    Ok(body) => ApiResult::from_response(status.as_u16(), &status_text, &headers, body),
                    Err(e) => {
                        tracing::warn!(%method, %url, error = %e, "Failed to read response body");
                        ApiResult::transport_failure(&e.to_string())
                    }
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(%method, %url, "Request timed out");
                ApiResult::transport_failure("timeout")
            }
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "Request failed");
                ApiResult::transport_failure(&e.to_string())
            }
        };

        let elapsed = start.elapsed();
        tracing::debug!(
            %method,
            %url,
            status = result.status_code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "API request completed"
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_request(method.as_str(), &request.url, outcome_label(&result), elapsed);
        }

        result
    }
}

/// Parse a server base URL: http or https, with a host.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl(raw.to_string()))?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if !matches!(url.scheme(), "http" | "https") || !has_host {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn outcome_label<T>(result: &ApiResult<T>) -> &'static str {
    if result.is_success() {
        "success"
    } else if result.is_accepted() {
        "accepted"
    } else if result.is_not_modified() {
        "not_modified"
    } else {
        "error"
    }
}
