//! # Demo Scenarios
//!
//! Each scenario drives a subject through a fixed sequence and returns a
//! [`ScenarioReport`] built from the subject's counters.

use crate::config::DemoConfig;
use crate::event::{on_notify, ClassObserver, DeliveryLog, Event};
use anyhow::{anyhow, bail, Context, Result};
use shared_subject::{MetricsSnapshot, Subject};
use shared_util::{Singleton, ThreadGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Process-wide subject used by the demo binary.
static EVENTS: Singleton<Arc<Subject<Event>>> = Singleton::new();

/// The process-wide demo subject, created on first use.
pub fn global_subject() -> Arc<Subject<Event>> {
    Arc::clone(EVENTS.instance())
}

/// Outcome of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub metrics: MetricsSnapshot,
    /// Entries written to the delivery log while the scenario ran
    pub logged: usize,
    /// Observers still registered when the scenario finished
    pub remaining_observers: usize,
}

impl ScenarioReport {
    fn capture(name: &'static str, subject: &Subject<Event>, logged: usize) -> Self {
        Self {
            name,
            metrics: subject.metrics(),
            logged,
            remaining_observers: subject.observer_count(),
        }
    }

    /// Write the report to the log.
    pub fn log(&self) {
        info!(
            scenario = self.name,
            sync_rounds = self.metrics.sync_rounds,
            async_rounds = self.metrics.async_rounds,
            deliveries = self.metrics.deliveries,
            skipped = self.metrics.skipped_deliveries,
            async_panics = self.metrics.async_panics,
            logged = self.logged,
            remaining = self.remaining_observers,
            "Scenario finished"
        );
    }
}

/// Register one observer of every kind, then notify while targets are
/// dropped and observers are removed.
///
/// Sequence:
/// 1. sync + async notify with four observers
/// 2. drop the scoped member target
/// 3. sync + async notify (the scoped member is skipped)
/// 4. remove the free function and the closure, notify again
/// 5. remove the rest, notify an empty subject
pub fn run_single_thread(
    subject: &Subject<Event>,
    log: &Arc<DeliveryLog>,
    config: &DemoConfig,
) -> Result<ScenarioReport> {
    let logged_before = log.len();

    let function_id = subject.add_observer_with(Arc::clone(log), on_notify);

    let closure_log = Arc::clone(log);
    let closure_id = subject.add_observer(move |event: &Event| {
        info!(event_id = event.id, msg = %event.message, "Closure observer notified");
        closure_log.record("lambda", event);
    });

    let long_lived = Arc::new(ClassObserver::new("class", Arc::clone(log)));
    let long_lived_id = subject.add_member_observer(&long_lived, ClassObserver::on_notify);

    let scoped_id = {
        let scoped = Arc::new(ClassObserver::new("scoped", Arc::clone(log)));
        let id = subject.add_member_observer(&scoped, ClassObserver::on_notify);

        subject.notify(&Event::new(1, "Synchronous notification"));
        subject.notify_async(Event::new(2, "Asynchronous notification"));
        id
    };
    debug!(observer = %scoped_id, "Scoped target dropped");

    subject.notify(&Event::new(3, "Synchronous notification after scope exit"));
    subject.notify_async(Event::new(3, "Asynchronous notification after scope exit"));

    subject.remove_observer(function_id);
    subject.remove_observer(closure_id);

    subject.notify(&Event::new(4, "Synchronous notification after removal"));
    subject.notify_async(Event::new(4, "Asynchronous notification after removal"));

    subject.remove_observer(long_lived_id);
    subject.remove_observer(scoped_id);

    subject.notify(&Event::new(5, "Synchronous notification to nobody"));
    subject.notify_async(Event::new(5, "Asynchronous notification to nobody"));

    settle(subject, config.settle_timeout)?;
    Ok(ScenarioReport::capture(
        "single_thread",
        subject,
        log.len() - logged_before,
    ))
}

/// Notify from one thread while another keeps adding and removing an
/// observer.
pub fn run_multi_thread(
    subject: Arc<Subject<Event>>,
    log: Arc<DeliveryLog>,
    config: &DemoConfig,
) -> Result<ScenarioReport> {
    let logged_before = log.len();
    let stop = Arc::new(AtomicBool::new(false));

    // Finite rounds: dropping this guard on an early return always terminates
    let notifier = {
        let subject = Arc::clone(&subject);
        let rounds = config.notify_rounds;
        let interval = config.notify_interval;

        ThreadGuard::spawn_named("subject-notifier", move || {
            for round in 1..=rounds {
                subject.notify(&Event::new(round, "Notification from notifier thread"));
                thread::sleep(interval);
            }
            rounds
        })
        .context("Failed to spawn notifier thread")?
    };

    let churn = {
        let subject = Arc::clone(&subject);
        let log = Arc::clone(&log);
        let stop = Arc::clone(&stop);
        let interval = config.churn_interval;

        ThreadGuard::spawn_named("subject-churn", move || {
            let mut cycles = 0_u32;
            while !stop.load(Ordering::SeqCst) {
                let id = subject.add_observer_with(Arc::clone(&log), on_notify);
                debug!(observer = %id, "Churn observer added");
                thread::sleep(interval);

                subject.remove_observer(id);
                debug!(observer = %id, "Churn observer removed");
                thread::sleep(interval);
                cycles += 1;
            }
            cycles
        })
        .context("Failed to spawn churn thread")?
    };

    let rounds = notifier.join();
    stop.store(true, Ordering::SeqCst);
    let cycles = churn.join().map_err(|_| anyhow!("Churn thread panicked"))?;
    let rounds = rounds.map_err(|_| anyhow!("Notifier thread panicked"))?;

    info!(rounds, churn_cycles = cycles, "Multi-thread scenario threads joined");
    Ok(ScenarioReport::capture(
        "multi_thread",
        &subject,
        log.len() - logged_before,
    ))
}

/// Fan a concurrent notification out over a small tokio blocking pool.
pub fn run_tokio_executor(
    log: Arc<DeliveryLog>,
    observers: usize,
    config: &DemoConfig,
) -> Result<ScenarioReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(2)
        .thread_name("subject-pool")
        .build()
        .context("Failed to build tokio runtime")?;

    let subject: Subject<Event> = Subject::new().on_runtime(runtime.handle().clone());
    let logged_before = log.len();

    let targets: Vec<Arc<ClassObserver>> = (0..observers)
        .map(|i| Arc::new(ClassObserver::new(format!("pooled-{i}"), Arc::clone(&log))))
        .collect();
    for target in &targets {
        subject.add_member_observer(target, ClassObserver::on_notify);
    }

    let launched = subject.notify_async(Event::new(100, "Pooled notification"));
    info!(launched, "Units queued on blocking pool");

    settle(&subject, config.settle_timeout)?;
    Ok(ScenarioReport::capture(
        "tokio_executor",
        &subject,
        log.len() - logged_before,
    ))
}

/// Wait until every unit the subject launched has finished.
fn settle(subject: &Subject<Event>, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let in_flight = subject.metrics().units_in_flight();
        if in_flight == 0 {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("{in_flight} notification units still running after {timeout:?}");
        }
        thread::sleep(Duration::from_millis(5));
    }
}
