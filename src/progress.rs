//! Progress reporting utilities using indicatif.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for the upload phase.
///
/// The sync core reports through this trait so it never touches the
/// terminal directly.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts with the total item count.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called as each item begins processing.
    ///
    /// `current` is the item's 1-based ordinal; items complete in
    /// arbitrary order, so it is display-only.
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress bar for the upload pass.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter. When `quiet` is set no bar is drawn.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:>8} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(total as u64).with_style(Self::style());
        bar.set_prefix(phase.to_string());
        bar.enable_steady_tick(Duration::from_millis(150));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_progress(&self, _current: usize, path: &str) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_message(path.to_string());
                bar.inc(1);
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
