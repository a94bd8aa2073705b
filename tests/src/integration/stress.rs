//! # Concurrency Stress Tests
//!
//! Many threads registering, removing and notifying on one subject at once.
//! Assertions only cover what the registry guarantees under contention:
//! unique increasing handles, consistent counts and no lost removals.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use rand::Rng;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use shared_subject::{ObserverId, Subject, SubjectConfig, SyncDispatch};
    use shared_util::ThreadGuard;

    const WORKERS: usize = 8;
    const OPS_PER_WORKER: usize = 200;

    /// Handles from concurrent registrations are unique and in issue order
    /// per thread
    #[test]
    fn test_concurrent_registration_unique_handles() {
        let subject: Arc<Subject<u32>> = Arc::new(Subject::new());

        let workers: Vec<ThreadGuard<Vec<ObserverId>>> = (0..WORKERS)
            .map(|_| {
                let subject = Arc::clone(&subject);
                ThreadGuard::spawn(move || {
                    (0..OPS_PER_WORKER)
                        .map(|_| subject.add_observer(|_: &u32| {}))
                        .collect()
                })
            })
            .collect();

        let mut all = BTreeSet::new();
        for worker in workers {
            let ids = worker.join().unwrap();
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            all.extend(ids);
        }

        assert_eq!(all.len(), WORKERS * OPS_PER_WORKER);
        assert_eq!(all.first().map(|id| id.get()), Some(1));
        assert_eq!(
            all.last().map(|id| id.get()),
            Some((WORKERS * OPS_PER_WORKER) as u64)
        );
        assert_eq!(subject.observer_count(), WORKERS * OPS_PER_WORKER);
    }

    /// Random add / remove / notify mix; every observer a worker still owns
    /// at the end is registered, everything it removed is gone
    #[test]
    fn test_random_churn_keeps_table_consistent() {
        let subject: Arc<Subject<u32>> = Arc::new(Subject::new());
        let delivered = Arc::new(AtomicUsize::new(0));

        let workers: Vec<ThreadGuard<(Vec<ObserverId>, Vec<ObserverId>)>> = (0..WORKERS)
            .map(|_| {
                let subject = Arc::clone(&subject);
                let delivered = Arc::clone(&delivered);
                ThreadGuard::spawn(move || {
                    let mut rng = rand::thread_rng();
                    let mut owned = Vec::new();
                    let mut removed = Vec::new();

                    for round in 0..OPS_PER_WORKER {
                        match rng.gen_range(0..3) {
                            0 => {
                                let delivered = Arc::clone(&delivered);
                                owned.push(subject.add_observer(move |_: &u32| {
                                    delivered.fetch_add(1, Ordering::Relaxed);
                                }));
                            }
                            1 if !owned.is_empty() => {
                                let id = owned.swap_remove(rng.gen_range(0..owned.len()));
                                assert!(subject.remove_observer(id));
                                removed.push(id);
                            }
                            _ => subject.notify(&(round as u32)),
                        }
                    }
                    (owned, removed)
                })
            })
            .collect();

        let mut expected = 0;
        for worker in workers {
            let (owned, removed) = worker.join().unwrap();
            expected += owned.len();
            assert!(owned.iter().all(|id| subject.contains(*id)));
            assert!(removed.iter().all(|id| !subject.contains(*id)));
        }

        assert_eq!(subject.observer_count(), expected);

        let metrics = subject.metrics();
        assert_eq!(
            metrics.observers_added - metrics.observers_removed,
            expected as u64
        );
        assert_eq!(metrics.deliveries, delivered.load(Ordering::Relaxed) as u64);
    }

    /// Snapshot rounds let observers register more observers mid-delivery
    #[test]
    fn test_snapshot_allows_registration_from_observers() {
        let config = SubjectConfig::default().with_sync_dispatch(SyncDispatch::Snapshot);
        let subject: Arc<Subject<u32>> = Arc::new(Subject::with_config(config).unwrap());
        let spawned = Arc::new(Mutex::new(Vec::new()));

        {
            let weak = Arc::downgrade(&subject);
            let spawned = Arc::clone(&spawned);
            subject.add_observer(move |_: &u32| {
                if let Some(subject) = weak.upgrade() {
                    spawned.lock().push(subject.add_observer(|_: &u32| {}));
                }
            });
        }

        let notifiers: Vec<ThreadGuard> = (0..4_u32)
            .map(|n| {
                let subject = Arc::clone(&subject);
                ThreadGuard::spawn(move || {
                    for round in 0..10 {
                        subject.notify(&(n * 10 + round));
                        thread::sleep(Duration::from_millis(1));
                    }
                })
            })
            .collect();
        drop(notifiers);

        assert_eq!(spawned.lock().len(), 40);
        assert_eq!(subject.observer_count(), 41);
    }

    /// Concurrent rounds racing removals never deliver to an observer after
    /// its removal returned
    #[test]
    fn test_no_sync_delivery_after_removal() {
        let subject: Arc<Subject<u32>> = Arc::new(Subject::new());
        let removed_flag = Arc::new(Mutex::new(false));
        let late = Arc::new(AtomicUsize::new(0));

        let id = {
            let removed_flag = Arc::clone(&removed_flag);
            let late = Arc::clone(&late);
            subject.add_observer(move |_: &u32| {
                if *removed_flag.lock() {
                    late.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        let notifier = {
            let subject = Arc::clone(&subject);
            ThreadGuard::spawn(move || {
                for round in 0..500 {
                    subject.notify(&round);
                }
            })
        };

        thread::sleep(Duration::from_millis(1));
        subject.remove_observer(id);
        *removed_flag.lock() = true;
        notifier.join().unwrap();

        assert_eq!(late.load(Ordering::SeqCst), 0);
    }
}
