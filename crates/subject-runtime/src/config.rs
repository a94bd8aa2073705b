//! Scenario timing.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading the demo configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Timing for the multi-thread scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Synchronous notifications sent by the notifier thread
    pub notify_rounds: u32,
    /// Pause between notifications
    pub notify_interval: Duration,
    /// How long the churn thread keeps an observer registered (and then
    /// unregistered) per cycle
    pub churn_interval: Duration,
    /// Upper bound when waiting for detached units to finish
    pub settle_timeout: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            notify_rounds: 20,
            notify_interval: Duration::from_millis(20),
            churn_interval: Duration::from_millis(50),
            settle_timeout: Duration::from_secs(5),
        }
    }
}

impl DemoConfig {
    /// Load from `SUBJECT_DEMO_ROUNDS`, `SUBJECT_DEMO_INTERVAL_MS` and
    /// `SUBJECT_DEMO_CHURN_MS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            notify_rounds: parse_var("SUBJECT_DEMO_ROUNDS")?.unwrap_or(defaults.notify_rounds),
            notify_interval: parse_var("SUBJECT_DEMO_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.notify_interval),
            churn_interval: parse_var("SUBJECT_DEMO_CHURN_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.churn_interval),
            settle_timeout: defaults.settle_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notify_rounds == 0 {
            return Err(ConfigError::Zero("notify_rounds"));
        }
        if self.churn_interval.is_zero() {
            return Err(ConfigError::Zero("churn_interval"));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(None),
    }
}
