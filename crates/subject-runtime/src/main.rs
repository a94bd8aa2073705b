//! # Subject Runtime
//!
//! Runs the demo scenarios against the observer registry and logs what each
//! one delivered.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from `SUBJECT_*` / `RUST_LOG`
//! 2. Load scenario timing from `SUBJECT_DEMO_*`
//! 3. Single-thread scenario on the process-wide subject
//! 4. Multi-thread scenario (notifier + churn threads)
//! 5. Tokio executor scenario on a bounded blocking pool

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use subject_runtime::{
    global_subject, run_multi_thread, run_single_thread, run_tokio_executor, DeliveryLog,
    DemoConfig,
};
use subject_telemetry::{init_logging, TelemetryConfig};

const POOLED_OBSERVERS: usize = 8;

fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let config = DemoConfig::from_env().context("Invalid demo configuration")?;

    info!("===========================================");
    info!("  Subject Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(?config, "Loaded demo configuration");

    let subject = global_subject();
    let log = DeliveryLog::new();

    run_single_thread(&subject, &log, &config)
        .context("Single-thread scenario failed")?
        .log();

    run_multi_thread(Arc::clone(&subject), Arc::clone(&log), &config)
        .context("Multi-thread scenario failed")?
        .log();

    run_tokio_executor(Arc::clone(&log), POOLED_OBSERVERS, &config)
        .context("Tokio executor scenario failed")?
        .log();

    info!(total_logged = log.len(), "All scenarios complete");
    Ok(())
}
