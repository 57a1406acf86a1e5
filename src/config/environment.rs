use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::services::api::{parse_base_url, ApiAuth};
use crate::services::poller::PollerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid poller configuration: {0}")]
    Poller(#[from] validator::ValidationErrors),
}

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub auth: Option<ApiAuth>,
    pub request_timeout: Duration,
    pub poller: PollerConfig,
    pub dashboard_view: Option<String>,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("GOCD_BASE_URL").map_err(|_| ConfigError::Missing("GOCD_BASE_URL"))?;
        if parse_base_url(&base_url).is_err() {
            return Err(ConfigError::Invalid {
                name: "GOCD_BASE_URL",
                value: base_url,
            });
        }

        let auth = load_auth()?;

        let request_timeout = Duration::from_secs(parse_or("GOCD_REQUEST_TIMEOUT_SECS", 30u64)?);

        let poller = PollerConfig {
            interval_secs: parse_or("GOCD_POLL_INTERVAL_SECS", 10u64)?,
            initial_delay_secs: parse_or("GOCD_POLL_INITIAL_DELAY_SECS", 0u64)?,
            visibility_backoff_factor: parse_or("GOCD_POLL_BACKOFF_FACTOR", 4.0f64)?,
            jitter_factor: parse_or("GOCD_POLL_JITTER", 0.0f64)?,
        };
        poller.validate()?;

        let dashboard_view = env::var("GOCD_DASHBOARD_VIEW").ok().filter(|v| !v.is_empty());

        let bind_addr = env::var("WATCH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            base_url,
            auth,
            request_timeout,
            poller,
            dashboard_view,
            bind_addr,
        })
    }
}

/// A token wins over basic credentials; a username without a password is an error.
fn load_auth() -> Result<Option<ApiAuth>, ConfigError> {
    if let Ok(token) = env::var("GOCD_ACCESS_TOKEN") {
        if !token.is_empty() {
            return Ok(Some(ApiAuth::Bearer { token }));
        }
    }

    match env::var("GOCD_USERNAME") {
        Ok(username) if !username.is_empty() => {
            let password = env::var("GOCD_PASSWORD").map_err(|_| ConfigError::Missing("GOCD_PASSWORD"))?;
            Ok(Some(ApiAuth::Basic { username, password }))
        }
        _ => Ok(None),
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
