//! # Subject Telemetry
//!
//! Structured logging for binaries and test harnesses built on
//! `shared-subject`. Library crates only emit `tracing` events; this crate
//! installs the subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subject_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Registry debug/trace events are now printed
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SUBJECT_SERVICE_NAME` | `observer-subject` | Service name attached to the startup log |
//! | `SUBJECT_LOG_LEVEL` | `info` | Log filter directive (falls back to `RUST_LOG`) |
//! | `SUBJECT_JSON_LOGS` | `false` | Emit JSON lines instead of human-readable output |
//! | `SUBJECT_THREAD_NAMES` | `true` | Include thread names (notification units are named) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
