//! # Subject Runtime
//!
//! Demonstration scenarios for the observer registry.
//!
//! ## Modules
//!
//! - `event/` - Demo payload, a member-style observer and a delivery log
//! - `config/` - Scenario timing loaded from the environment
//! - `scenarios/` - Single-thread, multi-thread and tokio-executor runs
//!
//! ## Scenarios
//!
//! ```text
//! single_thread:  free fn + closure + member(long-lived) + member(scoped)
//!                 notify / notify_async, drop scoped target, remove observers
//!
//! multi_thread:   [notifier thread] ──notify every interval──→ Subject
//!                 [churn thread]    ──add / remove observer──→ Subject
//!
//! tokio_executor: notify_async units on the runtime's blocking pool
//! ```

pub mod config;
pub mod event;
pub mod scenarios;

pub use config::{ConfigError, DemoConfig};
pub use event::{ClassObserver, DeliveryLog, Event};
pub use scenarios::{global_subject, run_multi_thread, run_single_thread, run_tokio_executor, ScenarioReport};
