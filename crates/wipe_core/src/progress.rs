use std::sync::atomic::{AtomicUsize, Ordering};

/// Observer of per-item sanitization progress.
///
/// `on_item_done` is invoked exactly once per finished item and may be
/// called from any worker concurrently; the completed count increases by
/// exactly one per call. The label reflects only the most recent update
/// and has no ordering guarantee relative to other concurrent updates.
pub trait ProgressObserver: Send + Sync {
    /// An item has entered its sanitization pipeline.
    fn on_item_start(&self, _label: &str) {}

    /// An item has finished its sanitization pipeline.
    fn on_item_done(&self, _label: &str, _completed: usize, _total: usize) {}
}

/// Observer that ignores every update; used in tests and in contexts
/// without an interactive display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Progress state for one sanitization batch.
///
/// The total is frozen at construction, before any worker starts, and is
/// never revised even if the tree changes during the run.
pub struct BatchProgress<'a> {
    total: usize,
    completed: AtomicUsize,
    observer: &'a dyn ProgressObserver,
}

impl<'a> BatchProgress<'a> {
    /// Create progress state for a batch of `total` items.
    pub fn new(total: usize, observer: &'a dyn ProgressObserver) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            observer,
        }
    }

    /// The frozen item count for this batch.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of items finished so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub(crate) fn started(&self, label: &str) {
        self.observer.on_item_start(label);
    }

    pub(crate) fn finished(&self, label: &str) {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.observer.on_item_done(label, done, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    struct Recorder {
        updates: Mutex<Vec<(String, usize, usize)>>,
    }

    impl ProgressObserver for Recorder {
        fn on_item_done(&self, label: &str, completed: usize, total: usize) {
            self.updates
                .lock()
                .unwrap()
                .push((label.to_string(), completed, total));
        }
    }

    #[test]
    fn completed_count_increments_by_one_per_item() {
        let recorder = Recorder {
            updates: Mutex::new(Vec::new()),
        };
        let progress = BatchProgress::new(3, &recorder);

        progress.finished("a");
        progress.finished("b");
        progress.finished("c");

        assert_eq!(progress.completed(), 3);
        let updates = recorder.updates.lock().unwrap();
        let counts: Vec<usize> = updates.iter().map(|(_, done, _)| *done).collect();
        assert_eq!(counts, vec![1, 2, 3]);
        assert!(updates.iter().all(|(_, _, total)| *total == 3));
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let progress = BatchProgress::new(40, &NoopObserver);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10 {
                        progress.finished("item");
                    }
                });
            }
        });

        assert_eq!(progress.completed(), 40);
    }
}
