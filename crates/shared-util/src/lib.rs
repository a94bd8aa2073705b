//! # Shared Utilities
//!
//! Small helpers used alongside the observer registry:
//!
//! - [`ThreadGuard`]: owns a spawned thread and joins it when dropped.
//! - [`Singleton`]: a process-wide instance with one-time initialization,
//!   usable from a `static`.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod singleton;
pub mod thread_guard;

pub use singleton::{Singleton, SingletonError};
pub use thread_guard::ThreadGuard;
