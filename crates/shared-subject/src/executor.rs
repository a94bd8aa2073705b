//! # Detached Notification Units
//!
//! `notify_async` turns every subscription into a [`DeliveryUnit`] that owns
//! a clone of the callback, a clone of the payload and a handle to the
//! metrics. Units never reference the subject, so they stay valid if the
//! subject is dropped while they run.

use crate::config::{AsyncPanicPolicy, SubjectConfig};
use crate::handle::ObserverId;
use crate::metrics::SubjectMetrics;
use crate::subscription::Subscription;
use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, trace, warn};

/// Where detached units run.
#[derive(Debug, Clone, Default)]
pub enum AsyncExecutor {
    /// One new OS thread per observer per notification.
    #[default]
    Thread,
    /// Fire-and-forget `spawn_blocking` on a tokio runtime. The runtime's
    /// blocking pool caps how many units run at once.
    Tokio(tokio::runtime::Handle),
}

/// Handoff states shared between a unit and the call that launched it.
const PENDING: u8 = 0;
const ACCEPTED: u8 = 1;
const DISCARDED: u8 = 2;

/// A single fire-and-forget delivery.
///
/// A unit that is dropped without running reports itself: before the
/// executor accepted it, [`AsyncExecutor::launch`] returns an error; after,
/// the drop is logged and counted in `units_dropped`.
pub(crate) struct DeliveryUnit<P> {
    id: ObserverId,
    subscription: Subscription<P>,
    payload: P,
    metrics: Arc<SubjectMetrics>,
    panic_policy: AsyncPanicPolicy,
    handoff: Arc<AtomicU8>,
    ran: bool,
}

impl<P> DeliveryUnit<P> {
    pub(crate) fn new(
        id: ObserverId,
        subscription: Subscription<P>,
        payload: P,
        metrics: Arc<SubjectMetrics>,
        panic_policy: AsyncPanicPolicy,
    ) -> Self {
        Self {
            id,
            subscription,
            payload,
            metrics,
            panic_policy,
            handoff: Arc::new(AtomicU8::new(PENDING)),
            ran: false,
        }
    }
}

impl<P: 'static> DeliveryUnit<P> {
    fn run(mut self) {
        self.ran = true;
        trace!(observer = %self.id, "Running detached delivery");
        self.metrics.record_delivery();

        let subscription = &self.subscription;
        let payload = &self.payload;
        let outcome = catch_unwind(AssertUnwindSafe(|| subscription.invoke(payload)));

        if let Err(panic) = outcome {
            let message = panic_message(panic.as_ref());
            match self.panic_policy {
                AsyncPanicPolicy::Log => {
                    self.metrics.record_async_panic();
                    error!(observer = %self.id, panic = %message, "Observer panicked in detached unit");
                }
                AsyncPanicPolicy::Abort => {
                    error!(observer = %self.id, panic = %message, "Observer panicked in detached unit, aborting");
                    std::process::abort();
                }
            }
        }

        self.metrics.record_unit_finished();
    }
}

impl<P> Drop for DeliveryUnit<P> {
    fn drop(&mut self) {
        if self.ran {
            return;
        }
        // Still pending: the launcher sees DISCARDED and reports the failure
        let accepted = self
            .handoff
            .compare_exchange(PENDING, DISCARDED, Ordering::AcqRel, Ordering::Acquire)
            .is_err();
        if accepted {
            self.metrics.record_unit_dropped();
            warn!(observer = %self.id, "Notification unit discarded by executor without running");
        }
    }
}

impl AsyncExecutor {
    /// Launch `unit` and detach it immediately.
    ///
    /// # Errors
    ///
    /// Fails if the thread could not be spawned, or if the executor dropped
    /// the unit instead of queueing it (for example a shut down runtime).
    pub(crate) fn launch<P>(&self, unit: DeliveryUnit<P>, config: &SubjectConfig) -> io::Result<()>
    where
        P: Send + 'static,
    {
        let handoff = Arc::clone(&unit.handoff);

        match self {
            Self::Thread => {
                let mut builder = thread::Builder::new()
                    .name(format!("{}-{}", config.thread_name_prefix, unit.id.get()));
                if let Some(bytes) = config.stack_size {
                    builder = builder.stack_size(bytes);
                }
                // Dropping the JoinHandle detaches the thread
                builder.spawn(move || unit.run()).map(drop)?;
            }
            Self::Tokio(handle) => {
                // spawn_blocking panics when the OS refuses a new pool thread
                catch_unwind(AssertUnwindSafe(|| {
                    drop(handle.spawn_blocking(move || unit.run()));
                }))
                .map_err(|panic| io::Error::other(panic_message(panic.as_ref())))?;
            }
        }

        match handoff.compare_exchange(PENDING, ACCEPTED, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => Ok(()),
            Err(_) => Err(io::Error::other("executor discarded the unit without running it")),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
