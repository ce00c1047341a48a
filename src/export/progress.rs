//! Progress tracking for export operations
//!
//! This module provides progress bar and statistics tracking for
//! long-running exports, giving users real-time feedback while pages
//! stream out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress tracker for export operations
///
/// Tracks waypoint throughput and displays a spinner with statistics.
/// The total is unknown up front - the engine streams until the data
/// source is exhausted - so the bar is always a spinner.
pub struct ProgressTracker {
    /// Number of waypoints written so far
    written: AtomicU64,
    /// Start time of the operation
    start_time: Instant,
    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `enable_bar` - Whether to display a progress spinner
    ///
    /// # Returns
    /// * `Self` - New progress tracker instance
    pub fn new(enable_bar: bool) -> Self {
        let bar = if enable_bar {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {pos} waypoints {msg}")
                    .unwrap(),
            );
            Some(bar)
        } else {
            None
        };

        Self {
            written: AtomicU64::new(0),
            start_time: Instant::now(),
            bar,
        }
    }

    /// Update progress with new count
    ///
    /// # Arguments
    /// * `count` - Total number of waypoints written so far
    pub fn update(&self, count: u64) {
        self.written.store(count, Ordering::Relaxed);

        if let Some(ref bar) = self.bar {
            bar.set_position(count);

            let elapsed = self.start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                let speed = count as f64 / elapsed;
                bar.set_message(format!("({speed:.0} waypoints/sec)"));
            }
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
