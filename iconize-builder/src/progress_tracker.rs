//! Progress reporting for rendering jobs running on several threads

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe counter that logs rendering progress
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    start_time: Instant,
    label: String,
}

impl ProgressTracker {
    /// Creates a new progress tracker
    pub fn new(total: u64, label: &str) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Number of jobs reported so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Increments the processed count by one and logs every `report_interval` jobs
    pub fn increment_and_report(&self, report_interval: u64) {
        let current = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if current == self.total || (report_interval > 0 && current % report_interval == 0) {
            self.report(current);
        }
    }

    fn report(&self, current: u64) {
        let elapsed = format_duration(self.start_time.elapsed().as_secs_f64());
        let percent = if self.total > 0 {
            (current as f64 / self.total as f64) * 100.0
        } else {
            100.0
        };

        if current >= self.total {
            log::info!(
                "{} {}/{} (100.0%) - completed in {}",
                self.label,
                current,
                self.total,
                elapsed
            );
        } else {
            log::debug!(
                "{} {}/{} ({:.1}%) - elapsed: {}",
                self.label,
                current,
                self.total,
                percent,
                elapsed
            );
        }
    }
}

/// Formats seconds into a human-readable duration string
fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}
