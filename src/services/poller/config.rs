use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Upper bound on the hidden-page multiplier.
pub const MAX_BACKOFF_FACTOR: f64 = 1000.0;

/// No computed delay is ever longer than this.
pub const MAX_POLL_DELAY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Poll schedule settings.
///
/// Defaults: poll every 10s, first poll immediately, poll 4x less often
/// while the page is hidden, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PollerConfig {
    #[serde(default = "default_interval_secs")]
    #[validate(range(min = 1, message = "Poll interval must be at least one second"))]
    pub interval_secs: u64,

    #[serde(default)]
    pub initial_delay_secs: u64,

    #[serde(default = "default_visibility_backoff_factor")]
    #[validate(custom(function = "validate_backoff_factor"))]
    pub visibility_backoff_factor: f64,

    /// Fraction of each delay added at random, in `[0, jitter_factor)`.
    #[serde(default)]
    #[validate(custom(function = "validate_jitter_factor"))]
    pub jitter_factor: f64,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_visibility_backoff_factor() -> f64 {
    4.0
}

// Range checks pass NaN through, so finiteness is checked explicitly.
fn validate_backoff_factor(factor: f64) -> Result<(), ValidationError> {
    if factor.is_finite() && (1.0..=MAX_BACKOFF_FACTOR).contains(&factor) {
        Ok(())
    } else {
        Err(ValidationError::new("backoff_factor")
            .with_message(format!("Backoff factor must be between 1 and {}", MAX_BACKOFF_FACTOR).into()))
    }
}

fn validate_jitter_factor(jitter: f64) -> Result<(), ValidationError> {
    if jitter.is_finite() && (0.0..=1.0).contains(&jitter) {
        Ok(())
    } else {
        Err(ValidationError::new("jitter_factor").with_message("Jitter must be between 0 and 1".into()))
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            initial_delay_secs: 0,
            visibility_backoff_factor: default_visibility_backoff_factor(),
            jitter_factor: 0.0,
        }
    }
}

impl PollerConfig {
    pub fn new(interval_secs: u64, initial_delay_secs: u64, visibility_backoff_factor: f64) -> Self {
        Self {
            interval_secs,
            initial_delay_secs,
            visibility_backoff_factor,
            jitter_factor: 0.0,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    /// Delay before the next poll: `interval * (hidden ? factor : 1)`, capped
    /// at [`MAX_POLL_DELAY`]. Never panics, even for unvalidated values.
    pub fn delay_for(&self, hidden: bool) -> Duration {
        let factor = if hidden { self.visibility_backoff_factor } else { 1.0 };

        let jitter = if self.jitter_factor > 0.0 {
            let mut rng = rand::rng();
            rng.random::<f64>() * self.jitter_factor
        } else {
            0.0
        };

        let secs = self.interval_secs as f64 * factor * (1.0 + jitter);
        match Duration::try_from_secs_f64(secs) {
            Ok(delay) => delay.min(MAX_POLL_DELAY),
            // NaN or negative: fall back to the plain interval
            Err(_) if secs.is_nan() || secs < 0.0 => self.interval().min(MAX_POLL_DELAY),
            Err(_) => MAX_POLL_DELAY,
        }
    }
}
