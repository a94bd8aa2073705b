//! # Registration and Delivery Sequences
//!
//! Exercises the registry the way an application would: mixed observer
//! kinds, removal by handle and repeated notification rounds.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::sync::Arc;

    use shared_subject::{ObserverId, Subject, SubjectConfig, SyncDispatch};
    use subject_runtime::{ClassObserver, DeliveryLog, Event};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn record_free(log: &Arc<DeliveryLog>, event: &Event) {
        log.record("A", event);
    }

    // =============================================================================
    // MIXED OBSERVER KINDS
    // =============================================================================

    /// Free function, closure, live member and dropped member on one subject
    #[test]
    fn test_mixed_kinds_with_dropped_target() {
        let subject: Subject<Event> = Subject::new();
        let log = DeliveryLog::new();

        subject.add_observer_with(Arc::clone(&log), record_free);

        let closure_log = Arc::clone(&log);
        subject.add_observer(move |event: &Event| closure_log.record("B", event));

        let o1 = Arc::new(ClassObserver::new("C", Arc::clone(&log)));
        subject.add_member_observer(&o1, ClassObserver::on_notify);

        let o2 = Arc::new(ClassObserver::new("D", Arc::clone(&log)));
        let d = subject.add_member_observer(&o2, ClassObserver::on_notify);
        drop(o2);

        subject.notify(&Event::new(7, "payload"));

        assert_eq!(log.seen_by("A"), vec![7]);
        assert_eq!(log.seen_by("B"), vec![7]);
        assert_eq!(log.seen_by("C"), vec![7]);
        assert!(log.seen_by("D").is_empty());

        // The stale entry stays until removed explicitly
        assert!(subject.contains(d));
        assert_eq!(subject.observer_count(), 4);
        assert_eq!(subject.metrics().skipped_deliveries, 1);
    }

    /// Handles 1, 2, 3; removing 2 leaves 1 and 3 receiving
    #[test]
    fn test_remove_middle_handle() {
        let subject: Subject<u32> = Subject::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<ObserverId> = (1..=3_u64)
            .map(|tag| {
                let seen = Arc::clone(&seen);
                subject.add_observer(move |_: &u32| seen.lock().push(tag))
            })
            .collect();
        assert_eq!(
            ids.iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        assert!(subject.remove_observer(ids[1]));
        subject.notify(&0);

        assert_eq!(*seen.lock(), vec![1, 3]);
    }

    #[test]
    fn test_remove_is_idempotent_across_kinds() {
        let subject: Subject<Event> = Subject::new();
        let log = DeliveryLog::new();
        let target = Arc::new(ClassObserver::new("member", Arc::clone(&log)));

        let member = subject.add_member_observer(&target, ClassObserver::on_notify);
        let free = subject.add_observer(|_: &Event| {});

        assert!(subject.remove_observer(member));
        assert!(!subject.remove_observer(member));
        assert!(!subject.remove_observer(ObserverId::from_raw(99)));
        assert!(subject.remove_observer(free));
        assert!(subject.is_empty());

        let metrics = subject.metrics();
        assert_eq!(metrics.observers_added, 2);
        assert_eq!(metrics.observers_removed, 2);
    }

    #[test]
    fn test_handles_continue_after_removal() {
        let subject: Subject<()> = Subject::new();
        let first = subject.add_observer(|_| {});
        subject.remove_observer(first);
        let second = subject.add_observer(|_| {});

        assert!(second > first);
        assert_eq!(second.get(), 2);
    }

    /// Member observer with a bound tag ahead of the payload
    #[test]
    fn test_member_with_bound_argument() {
        struct Panel {
            seen: Mutex<Vec<String>>,
        }

        impl Panel {
            fn on_event(&self, tag: &&str, event: &Event) {
                self.seen.lock().push(format!("{tag}:{}", event.id));
            }
        }

        let subject: Subject<Event> = Subject::new();
        let panel = Arc::new(Panel {
            seen: Mutex::new(Vec::new()),
        });
        subject.add_member_observer_with(&panel, "status", Panel::on_event);

        subject.notify(&Event::new(1, "first"));
        subject.notify(&Event::new(2, "second"));

        assert_eq!(*panel.seen.lock(), vec!["status:1", "status:2"]);
    }

    // =============================================================================
    // SNAPSHOT DISPATCH
    // =============================================================================

    /// An observer removing itself mid-round in snapshot mode
    #[test]
    fn test_snapshot_observer_removes_itself() {
        let config = SubjectConfig::default().with_sync_dispatch(SyncDispatch::Snapshot);
        let subject: Arc<Subject<u32>> = Arc::new(Subject::with_config(config).unwrap());
        let own_id = Arc::new(Mutex::new(None::<ObserverId>));
        let calls = Arc::new(Mutex::new(0_u32));

        let id = {
            let weak = Arc::downgrade(&subject);
            let own_id = Arc::clone(&own_id);
            let calls = Arc::clone(&calls);
            subject.add_observer(move |_: &u32| {
                *calls.lock() += 1;
                if let (Some(subject), Some(id)) = (weak.upgrade(), *own_id.lock()) {
                    subject.remove_observer(id);
                }
            })
        };
        *own_id.lock() = Some(id);

        subject.notify(&1);
        subject.notify(&2);

        assert_eq!(*calls.lock(), 1);
        assert!(subject.is_empty());
    }
}
