//! Batch progress for curation runs
//!
//! The tally is kept whether or not a bar is drawn, so the closing log line
//! reports the same totals either way.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;

const TEMPLATE: &str = "{spinner:.green} [{elapsed}] {pos}/{len} {wide_msg}";

/// Running totals of a batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchTally {
    /// Documents curated
    pub curated: usize,
    /// Documents that failed
    pub failed: usize,
    /// Annotations removed across curated documents
    pub removed: usize,
}

impl fmt::Display for BatchTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} curated, {} failed, {} annotations removed",
            self.curated, self.failed, self.removed
        )
    }
}

/// Progress over the documents of one batch
pub struct CurationProgress {
    bar: Option<ProgressBar>,
    tally: BatchTally,
}

impl CurationProgress {
    /// Start tracking `documents` documents; draws a bar on stderr if enabled
    pub fn new(enabled: bool, documents: usize) -> Self {
        let bar = enabled.then(|| {
            let bar =
                ProgressBar::with_draw_target(Some(documents as u64), ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
                bar.set_style(style);
            }
            bar
        });
        Self {
            bar,
            tally: BatchTally::default(),
        }
    }

    /// A document was curated and lost `removed` annotations
    pub fn curated(&mut self, name: &str, removed: usize) {
        self.tally.curated += 1;
        self.tally.removed += removed;
        self.advance(format!("{name}: -{removed}"));
    }

    /// A document could not be curated
    pub fn failed(&mut self, name: &str) {
        self.tally.failed += 1;
        self.advance(format!("{name}: failed"));
    }

    fn advance(&self, message: String) {
        if let Some(bar) = &self.bar {
            bar.set_message(message);
            bar.inc(1);
        }
    }

    /// Close the bar and return the totals
    pub fn finish(self) -> BatchTally {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(self.tally.to_string());
        }
        self.tally
    }
}
