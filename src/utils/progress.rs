//! Progress reporting for long-running batch work

use indicatif::{ProgressBar, ProgressStyle};

/// Console progress bar shown while probing scenes and moving directories
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Creates a bar sized for `total` items, labeled with a short
    /// description of the batch
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"));
        bar.set_message(description.to_string());

        ProgressTracker {
            bar,
        }
    }

    /// Advances the bar by `amount` finished items
    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    /// Swaps the displayed description
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Marks the batch as done
    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }
}
