//! Console progress rendering for sanitization batches.

use indicatif::{ProgressBar, ProgressStyle};
use safe_wipe_core::ProgressObserver;

/// Renders batch progress as a single overwritten status line.
///
/// The bar learns the batch total from the first completion callback;
/// indicatif serializes concurrent updates internally, so the observer
/// is safe to share across workers.
pub struct ConsoleObserver {
    bar: ProgressBar,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "Securely erasing: {percent:>3}% ({pos}/{len}) {wide_msg}",
            )
            .expect("valid progress template"),
        );
        Self { bar }
    }

    /// Remove the status line once the batch ends.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleObserver {
    fn on_item_start(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn on_item_done(&self, label: &str, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(label.to_string());
        self.bar.set_position(completed as u64);
    }
}
