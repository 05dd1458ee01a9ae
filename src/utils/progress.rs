//! Progress indicators for batch runs
//!
//! A reduced wrapper over `indicatif` that gives every pipeline driver the
//! same look: one bar per batch, advanced once per source file. Bars are
//! hidden when the `WITPKG_NO_PROGRESS` environment variable is set (the
//! `--no-progress` flag sets it) so CI logs stay clean.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

/// Checks if progress bars should be disabled.
///
/// Progress output is suppressed when `WITPKG_NO_PROGRESS` is set to any
/// value.
fn is_progress_disabled() -> bool {
    std::env::var("WITPKG_NO_PROGRESS").is_ok()
}

/// A progress bar tracking one batch of source files.
///
/// When progress is disabled this wraps a hidden bar that silently ignores
/// all operations, so call sites never need to branch.
#[derive(Clone)]
pub struct BatchProgress {
    inner: IndicatifBar,
}

impl BatchProgress {
    /// Create a bar for a batch of `len` files.
    #[must_use]
    pub fn new(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(batch_style());
            bar
        };
        Self { inner: bar }
    }

    /// Set the message shown beside the bar (typically the current file).
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Advance the bar by one file.
    pub fn inc(&self) {
        self.inner.inc(1);
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn batch_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("━╸━")
}
