//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or
    /// `target=level` pairs)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include thread names in log lines
    pub thread_names: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "observer-subject".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            thread_names: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SUBJECT_SERVICE_NAME`: Service name (default: observer-subject)
    /// - `SUBJECT_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `SUBJECT_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `SUBJECT_THREAD_NAMES`: Include thread names (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            service_name: lookup("SUBJECT_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("SUBJECT_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("SUBJECT_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            thread_names: lookup("SUBJECT_THREAD_NAMES")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.thread_names),
        }
    }

    /// Builder-style method to set the log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
