//! # Subject
//!
//! The observer registry. One instance per payload type; several notify
//! parameters are expressed as a tuple payload.
//!
//! All table reads and writes go through one exclusive lock. `notify` keeps
//! it for the whole round (unless [`SyncDispatch::Snapshot`] is configured);
//! `notify_async` keeps it only while launching units.

use crate::config::{SubjectConfig, SyncDispatch};
use crate::error::SubjectError;
use crate::executor::{AsyncExecutor, DeliveryUnit};
use crate::handle::ObserverId;
use crate::metrics::{MetricsSnapshot, SubjectMetrics};
use crate::subscription::Subscription;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Handle allocator and registered observers, guarded together.
struct ObserverTable<P> {
    next_id: u64,
    observers: BTreeMap<ObserverId, Subscription<P>>,
}

impl<P> ObserverTable<P> {
    fn new() -> Self {
        Self {
            next_id: 0,
            observers: BTreeMap::new(),
        }
    }

    fn insert(&mut self, subscription: Subscription<P>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId::from_raw(self.next_id);
        self.observers.insert(id, subscription);
        id
    }
}

/// Thread-safe observer registry.
///
/// `Subject` is not `Clone`; share it behind an `Arc` or a
/// `static` instead.
///
/// # Invariants
///
/// 1. Handles are strictly increasing and never reused.
/// 2. Observers are invoked in ascending handle order.
/// 3. A member observer never keeps its target alive and is skipped once the
///    target is dropped.
/// 4. Dropping the subject drops every subscription without invoking it.
///
/// # Example
///
/// ```ignore
/// let subject: Subject<Event> = Subject::new();
///
/// let id = subject.add_observer(|event: &Event| println!("{event:?}"));
/// let window = Arc::new(Window::default());
/// subject.add_member_observer(&window, Window::on_event);
///
/// subject.notify(&Event::Resized);
/// subject.notify_async(Event::Closed);
/// subject.remove_observer(id);
/// ```
pub struct Subject<P> {
    table: Mutex<ObserverTable<P>>,
    config: SubjectConfig,
    executor: AsyncExecutor,
    metrics: Arc<SubjectMetrics>,
}

impl<P> std::fmt::Debug for Subject<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.lock();
        f.debug_struct("Subject")
            .field("next_id", &table.next_id)
            .field("observer_count", &table.observers.len())
            .field("config", &self.config)
            .field("executor", &self.executor)
            .finish()
    }
}

impl<P: 'static> Default for Subject<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> Subject<P> {
    /// Create a subject with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(SubjectConfig::default())
    }

    /// Create a subject with a validated configuration.
    pub fn with_config(config: SubjectConfig) -> Result<Self, SubjectError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SubjectConfig) -> Self {
        Self {
            table: Mutex::new(ObserverTable::new()),
            config,
            executor: AsyncExecutor::default(),
            metrics: Arc::new(SubjectMetrics::new()),
        }
    }

    /// Run detached units on a tokio runtime's blocking pool instead of
    /// spawning one OS thread each.
    #[must_use]
    pub fn on_runtime(mut self, handle: tokio::runtime::Handle) -> Self {
        self.executor = AsyncExecutor::Tokio(handle);
        self
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a free function or closure.
    pub fn add_observer<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.register(Subscription::free(callback))
    }

    /// Register a free callable with bound leading arguments.
    ///
    /// `bound` is moved into the subscription at registration time and handed
    /// to the callback before the payload on every notification. Use a tuple
    /// to bind several values.
    pub fn add_observer_with<A, F>(&self, bound: A, callback: F) -> ObserverId
    where
        A: Send + Sync + 'static,
        F: Fn(&A, &P) + Send + Sync + 'static,
    {
        self.add_observer(move |payload: &P| callback(&bound, payload))
    }

    /// Register a method on a shared target.
    ///
    /// Only a weak reference to `target` is kept. The method is skipped,
    /// without error, once every strong reference to the target is gone.
    ///
    /// ```ignore
    /// let panel = Arc::new(Panel::new("status"));
    /// subject.add_member_observer(&panel, Panel::on_event);
    /// ```
    pub fn add_member_observer<T, F>(&self, target: &Arc<T>, method: F) -> ObserverId
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &P) + Send + Sync + 'static,
    {
        self.register(Subscription::member(
            target,
            method,
            Arc::clone(&self.metrics),
        ))
    }

    /// Register a method on a shared target with bound leading arguments.
    pub fn add_member_observer_with<T, A, F>(&self, target: &Arc<T>, bound: A, method: F) -> ObserverId
    where
        T: Send + Sync + 'static,
        A: Send + Sync + 'static,
        F: Fn(&T, &A, &P) + Send + Sync + 'static,
    {
        self.add_member_observer(target, move |target: &T, payload: &P| {
            method(target, &bound, payload)
        })
    }

    fn register(&self, subscription: Subscription<P>) -> ObserverId {
        let kind = subscription.kind();
        let id = self.table.lock().insert(subscription);
        self.metrics.record_added();

        debug!(observer = %id, kind = ?kind, "Registered observer");
        id
    }

    /// Remove an observer.
    ///
    /// Unknown or already removed handles are ignored. Returns whether an
    /// entry was actually removed. Units already launched by `notify_async`
    /// still run.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        // The removed subscription is dropped after the lock is released
        let entry = self.table.lock().observers.remove(&id);
        let removed = entry.is_some();

        if removed {
            self.metrics.record_removed();
            debug!(observer = %id, "Removed observer");
        } else {
            trace!(observer = %id, "Remove ignored, unknown observer");
        }

        removed
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Notify every observer on the calling thread, in ascending handle order.
    ///
    /// Returns once every callback has returned. A panicking callback unwinds
    /// through this call; observers after it are not notified for this round
    /// and the lock is released.
    ///
    /// # Deadlocks
    ///
    /// With [`SyncDispatch::HoldLock`] the lock is held while callbacks run,
    /// so a callback that calls back into this subject deadlocks.
    pub fn notify(&self, payload: &P) {
        self.metrics.record_sync_round();

        match self.config.sync_dispatch {
            SyncDispatch::HoldLock => {
                let table = self.table.lock();
                trace!(observers = table.observers.len(), "Synchronous notify");
                for (id, subscription) in &table.observers {
                    self.deliver(*id, subscription, payload);
                }
            }
            SyncDispatch::Snapshot => {
                let snapshot: Vec<(ObserverId, Subscription<P>)> = {
                    let table = self.table.lock();
                    table
                        .observers
                        .iter()
                        .map(|(id, subscription)| (*id, subscription.clone()))
                        .collect()
                };
                trace!(observers = snapshot.len(), "Synchronous notify (snapshot)");
                for (id, subscription) in &snapshot {
                    self.deliver(*id, subscription, payload);
                }
            }
        }
    }

    fn deliver(&self, id: ObserverId, subscription: &Subscription<P>, payload: &P) {
        trace!(observer = %id, "Delivering notification");
        self.metrics.record_delivery();
        subscription.invoke(payload);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.table.lock().observers.len()
    }

    /// Whether no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().observers.is_empty()
    }

    /// Whether `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: ObserverId) -> bool {
        self.table.lock().observers.contains_key(&id)
    }

    /// Current dispatch counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SubjectConfig {
        &self.config
    }

    /// The executor used by `notify_async`.
    #[must_use]
    pub fn executor(&self) -> &AsyncExecutor {
        &self.executor
    }
}

impl<P: Clone + Send + 'static> Subject<P> {
    /// Notify every observer concurrently without waiting.
    ///
    /// Launches one detached unit per registered observer, each owning a
    /// clone of the payload, and returns the number launched. Units run
    /// after the lock is released and are never joined or cancelled. A unit
    /// that cannot be launched is logged and skipped; the rest of the round
    /// proceeds.
    pub fn notify_async(&self, payload: P) -> usize {
        self.metrics.record_async_round();

        let table = self.table.lock();
        let mut launched = 0;

        for (id, subscription) in &table.observers {
            let unit = DeliveryUnit::new(
                *id,
                subscription.clone(),
                payload.clone(),
                Arc::clone(&self.metrics),
                self.config.panic_policy,
            );

            // Counted before the handoff so a fast unit cannot finish first
            self.metrics.record_launch();
            match self.executor.launch(unit, &self.config) {
                Ok(()) => launched += 1,
                Err(e) => {
                    self.metrics.record_launch_rollback();
                    self.metrics.record_spawn_failure();
                    warn!(observer = %id, error = %e, "Failed to launch notification unit");
                }
            }
        }

        trace!(launched, observers = table.observers.len(), "Concurrent notify launched");
        launched
    }
}
