//! Dispatch counters for a subject
//!
//! ## Usage
//!
//! ```ignore
//! let subject: Subject<u32> = Subject::new();
//! subject.add_observer(|v| println!("{v}"));
//! subject.notify(&1);
//!
//! let snapshot = subject.metrics();
//! assert_eq!(snapshot.deliveries, 1);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters shared between a subject and the units it launches.
///
/// Detached units hold their own `Arc` to this struct, so counters keep
/// updating after the subject is dropped.
#[derive(Debug, Default)]
pub struct SubjectMetrics {
    /// Total observers registered
    pub observers_added: AtomicU64,
    /// Total observers actually removed (unknown handles are not counted)
    pub observers_removed: AtomicU64,
    /// Total synchronous notification rounds
    pub sync_rounds: AtomicU64,
    /// Total concurrent notification rounds
    pub async_rounds: AtomicU64,
    /// Total callback invocations started (sync and async)
    pub deliveries: AtomicU64,
    /// Member deliveries skipped because the target was dropped
    pub skipped_deliveries: AtomicU64,
    /// Detached units successfully launched
    pub units_launched: AtomicU64,
    /// Detached units that ran to the end (including caught panics)
    pub units_finished: AtomicU64,
    /// Accepted units the executor dropped without running them
    pub units_dropped: AtomicU64,
    /// Detached units that could not be launched
    pub spawn_failures: AtomicU64,
    /// Panics caught inside detached units
    pub async_panics: AtomicU64,
}

impl SubjectMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_added(&self) {
        self.observers_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removed(&self) {
        self.observers_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sync_round(&self) {
        self.sync_rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_async_round(&self) {
        self.async_rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped_deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_launch(&self) {
        self.units_launched.fetch_add(1, Ordering::Relaxed);
    }

    /// Undo a `record_launch` whose launch failed.
    pub fn record_launch_rollback(&self) {
        self.units_launched.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_unit_dropped(&self) {
        self.units_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unit_finished(&self) {
        self.units_finished.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spawn_failure(&self) {
        self.spawn_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_async_panic(&self) {
        self.async_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            observers_added: self.observers_added.load(Ordering::Relaxed),
            observers_removed: self.observers_removed.load(Ordering::Relaxed),
            sync_rounds: self.sync_rounds.load(Ordering::Relaxed),
            async_rounds: self.async_rounds.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            skipped_deliveries: self.skipped_deliveries.load(Ordering::Relaxed),
            units_launched: self.units_launched.load(Ordering::Relaxed),
            units_finished: self.units_finished.load(Ordering::Relaxed),
            units_dropped: self.units_dropped.load(Ordering::Relaxed),
            spawn_failures: self.spawn_failures.load(Ordering::Relaxed),
            async_panics: self.async_panics.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SubjectMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub observers_added: u64,
    pub observers_removed: u64,
    pub sync_rounds: u64,
    pub async_rounds: u64,
    pub deliveries: u64,
    pub skipped_deliveries: u64,
    pub units_launched: u64,
    pub units_finished: u64,
    pub units_dropped: u64,
    pub spawn_failures: u64,
    pub async_panics: u64,
}

impl MetricsSnapshot {
    /// Deliveries that reached a callback body
    pub fn completed_deliveries(&self) -> u64 {
        self.deliveries.saturating_sub(self.skipped_deliveries)
    }

    /// Launched units that have neither finished nor been dropped
    pub fn units_in_flight(&self) -> u64 {
        self.units_launched
            .saturating_sub(self.units_finished)
            .saturating_sub(self.units_dropped)
    }
}
