//! # Lifetime Tests
//!
//! Weak member targets and detached notification units, checked across
//! subject and target drops.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};

    use shared_subject::{Subject, SubjectConfigBuilder};
    use subject_runtime::{ClassObserver, DeliveryLog, Event};

    const WAIT: Duration = Duration::from_secs(5);

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    /// Registration never keeps the member target alive
    #[test]
    fn test_member_registration_is_weak() {
        let subject: Subject<Event> = Subject::new();
        let log = DeliveryLog::new();
        let target = Arc::new(ClassObserver::new("weak", Arc::clone(&log)));

        subject.add_member_observer(&target, ClassObserver::on_notify);
        subject.add_member_observer_with(&target, 3_u32, |t: &ClassObserver, _: &u32, e: &Event| {
            t.on_notify(e)
        });

        assert_eq!(Arc::strong_count(&target), 1);
        assert_eq!(Arc::weak_count(&target), 2);
    }

    /// Detached units keep running after the subject is gone
    #[test]
    fn test_units_outlive_subject() {
        let gate = Arc::new(Barrier::new(2));
        let (tx, rx) = mpsc::channel();

        {
            let subject: Subject<u32> = Subject::new();
            let gate = Arc::clone(&gate);
            let tx = parking_lot::Mutex::new(tx);
            subject.add_observer(move |value: &u32| {
                gate.wait();
                let _ = tx.lock().send(*value);
            });
            assert_eq!(subject.notify_async(41), 1);
        }

        // Subject dropped; release the unit
        gate.wait();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 41);
    }

    /// A target dropped before the unit runs is skipped without error
    #[test]
    fn test_async_target_dropped_before_run() {
        let subject: Subject<Event> = Subject::new();
        let log = DeliveryLog::new();
        let gate = Arc::new(Barrier::new(2));

        {
            let gate = Arc::clone(&gate);
            subject.add_observer(move |_: &Event| {
                gate.wait();
            });
        }
        let target = Arc::new(ClassObserver::new("late", Arc::clone(&log)));
        subject.add_member_observer(&target, ClassObserver::on_notify);

        drop(target);
        subject.notify_async(Event::new(1, "after drop"));
        gate.wait();

        assert!(wait_for(|| subject.metrics().units_in_flight() == 0));
        assert!(log.seen_by("late").is_empty());
        assert_eq!(subject.metrics().skipped_deliveries, 1);
    }

    /// Removing after launch does not cancel the launched unit
    #[test]
    fn test_remove_after_launch_still_delivers() {
        let subject: Subject<u32> = Subject::new();
        let gate = Arc::new(Barrier::new(2));
        let hits = Arc::new(AtomicUsize::new(0));

        let id = {
            let gate = Arc::clone(&gate);
            let hits = Arc::clone(&hits);
            subject.add_observer(move |_: &u32| {
                gate.wait();
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        subject.notify_async(1);
        assert!(subject.remove_observer(id));
        gate.wait();

        assert!(wait_for(|| hits.load(Ordering::SeqCst) == 1));
        assert_eq!(subject.notify_async(2), 0);
    }

    /// Unit threads carry the configured prefix and the observer handle
    #[test]
    fn test_unit_thread_names() {
        let config = SubjectConfigBuilder::new()
            .thread_name_prefix("ui-events")
            .build()
            .unwrap();
        let subject: Subject<()> = Subject::with_config(config).unwrap();
        let (tx, rx) = mpsc::channel();
        let tx = parking_lot::Mutex::new(tx);

        subject.add_observer(|_| {});
        subject.add_observer(move |_| {
            let name = thread::current().name().map(str::to_string);
            let _ = tx.lock().send(name);
        });

        subject.notify_async(());
        assert_eq!(
            rx.recv_timeout(WAIT).unwrap().as_deref(),
            Some("ui-events-2")
        );
    }

    /// On a tokio runtime, units run on its blocking pool
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_units_on_current_runtime() {
        let subject: Subject<u32> = Subject::new().on_runtime(tokio::runtime::Handle::current());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for tag in 0..3_u32 {
            let tx = tx.clone();
            subject.add_observer(move |value: &u32| {
                let _ = tx.send(tag * 100 + value);
            });
        }
        drop(tx);

        assert_eq!(subject.notify_async(7), 3);
        drop(subject);

        let mut received = Vec::new();
        while let Ok(Some(value)) = tokio::time::timeout(WAIT, rx.recv()).await {
            received.push(value);
        }
        received.sort_unstable();
        assert_eq!(received, vec![7, 107, 207]);
    }
}
