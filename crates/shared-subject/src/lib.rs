//! # Shared Subject - Observer Registry with Lifetime-Safe Dispatch
//!
//! A generic publish/subscribe primitive. Independent pieces of code register
//! callbacks on a [`Subject<P>`] and receive every payload `P` the subject is
//! notified with.
//!
//! ## Dispatch Strategies
//!
//! ```text
//!                  ┌─────────────────────────────┐
//!   add_observer ─→│          Subject<P>         │
//!   remove_obs.  ─→│  Mutex ─┬─ next_id          │
//!                  │         └─ BTreeMap<id, cb> │
//!                  └──────────────┬──────────────┘
//!                                 │
//!            notify(&p)           │          notify_async(p)
//!      ┌──────────────────────────┴───────────────────────────┐
//!      ▼                                                       ▼
//!  caller thread: cb1(&p), cb2(&p), ...        one detached unit per callback
//!  (guard held for the whole round)            (guard held only while launching)
//! ```
//!
//! ## Lifetime Safety
//!
//! Member observers are registered with an `Arc<T>` but only a `Weak<T>` is
//! stored. The weak reference is upgraded at invocation time, so a target
//! dropped before (or while) a notification is in flight is skipped instead
//! of being called.
//!
//! ## Known Limitations
//!
//! - With [`SyncDispatch::HoldLock`] a callback that calls back into the same
//!   subject deadlocks. Use [`SyncDispatch::Snapshot`] when observers need to
//!   register or remove observers from inside a callback.
//! - [`Subject::remove_observer`] does not cancel a unit already launched by
//!   [`Subject::notify_async`]; a removed observer may fire once more.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod error;
pub mod executor;
pub mod handle;
pub mod metrics;
pub mod subject;
pub mod subscription;

// Re-export main types
pub use config::{AsyncPanicPolicy, SubjectConfig, SubjectConfigBuilder, SyncDispatch};
pub use error::SubjectError;
pub use executor::AsyncExecutor;
pub use handle::ObserverId;
pub use metrics::{MetricsSnapshot, SubjectMetrics};
pub use subject::Subject;
pub use subscription::{Subscription, SubscriptionKind};

/// Default name prefix for threads spawned by `notify_async`.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "subject-notify";
