//! Demo payload and observers.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Payload delivered by the demo subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: u32,
    pub message: String,
}

impl Event {
    pub fn new(id: u32, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }
}

/// Records which observer saw which event.
#[derive(Debug, Default)]
pub struct DeliveryLog {
    entries: Mutex<Vec<(String, u32)>>,
}

impl DeliveryLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, observer: &str, event: &Event) {
        self.entries.lock().push((observer.to_string(), event.id));
    }

    /// Event ids seen by `observer`, in arrival order.
    pub fn seen_by(&self, observer: &str) -> Vec<u32> {
        self.entries
            .lock()
            .iter()
            .filter(|(name, _)| name == observer)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Member-style observer registered through a weak reference.
#[derive(Debug)]
pub struct ClassObserver {
    name: String,
    log: Arc<DeliveryLog>,
}

impl ClassObserver {
    pub fn new(name: impl Into<String>, log: Arc<DeliveryLog>) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_notify(&self, event: &Event) {
        info!(observer = %self.name, event_id = event.id, msg = %event.message, "Member observer notified");
        self.log.record(&self.name, event);
    }
}

/// Free-function observer with the log bound at registration.
pub fn on_notify(log: &Arc<DeliveryLog>, event: &Event) {
    info!(event_id = event.id, msg = %event.message, "Free function observer notified");
    log.record("function", event);
}
