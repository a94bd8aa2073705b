//! # Subscriptions
//!
//! Every registered observer, whatever its original shape, is erased into a
//! single `Fn(&P)` closure at registration time. The table only ever stores
//! that uniform shape.

use crate::metrics::SubjectMetrics;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Type-erased observer callback.
pub(crate) type Callback<P> = dyn Fn(&P) + Send + Sync;

/// Which registration form produced a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    /// Free function or closure; owns everything it needs.
    Free,
    /// Method on a shared target held through a weak reference.
    Member,
}

/// A registered observer.
///
/// Cloning is cheap (one `Arc` bump) and is how detached units carry their
/// own copy of the callback independently of the subject's table.
pub struct Subscription<P> {
    callback: Arc<Callback<P>>,
    kind: SubscriptionKind,
}

// Manual Clone: P itself need not be Clone.
impl<P> Clone for Subscription<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            kind: self.kind,
        }
    }
}

impl<P> std::fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<P: 'static> Subscription<P> {
    /// Wrap a free callable.
    pub(crate) fn free<F>(callback: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            kind: SubscriptionKind::Free,
        }
    }

    /// Wrap a method on `target` without taking ownership of it.
    ///
    /// The weak reference is resolved on every invocation. If the target has
    /// been dropped the call is skipped and counted in `metrics`.
    pub(crate) fn member<T, F>(target: &Arc<T>, method: F, metrics: Arc<SubjectMetrics>) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &P) + Send + Sync + 'static,
    {
        let weak: Weak<T> = Arc::downgrade(target);
        let callback = move |payload: &P| match weak.upgrade() {
            Some(target) => method(&target, payload),
            None => {
                metrics.record_skipped();
                debug!("Member observer target dropped, delivery skipped");
            }
        };

        Self {
            callback: Arc::new(callback),
            kind: SubscriptionKind::Member,
        }
    }

    /// Run the callback with `payload`.
    pub fn invoke(&self, payload: &P) {
        (self.callback)(payload);
    }

    /// The registration form of this subscription.
    #[must_use]
    pub fn kind(&self) -> SubscriptionKind {
        self.kind
    }
}
