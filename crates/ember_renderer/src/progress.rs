//! Render progress reporting.
//!
//! The renderer calls `update` once per finished scan line and `end`
//! once with the average traced-samples-per-pixel. Implementations must
//! be shareable across the worker pool.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress collaborator for a running render.
pub trait RenderProgress: Send + Sync {
    /// Called after each completed row with the total finished so far.
    fn update(&self, rows_completed: u32);

    /// Called once when the render finishes.
    fn end(&self, average_samples: f64);
}

/// Terminal progress bar.
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    /// Create a bar spanning `total_rows` scan lines.
    pub fn new(total_rows: u32) -> Self {
        let bar = ProgressBar::new(total_rows as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Rendering: [{bar:50}] {percent}% ETA: {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("= "),
        );
        Self { bar }
    }
}

impl RenderProgress for ProgressBarReporter {
    fn update(&self, rows_completed: u32) {
        self.bar.set_position(rows_completed as u64);
    }

    fn end(&self, average_samples: f64) {
        self.bar.finish();
        log::info!(
            "Render finished in {:.1?}, average sample count = {:.2}",
            self.bar.elapsed(),
            average_samples
        );
    }
}

/// Silent progress sink for tests and library use.
pub struct NullProgress;

impl RenderProgress for NullProgress {
    fn update(&self, _rows_completed: u32) {}

    fn end(&self, _average_samples: f64) {}
}
