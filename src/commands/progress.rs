//! Terminal progress reporting for long-running commands.

use crate::parser::slice::{SliceObserver, SliceProgress};
use crate::utils::config::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

/// Build a bar in the `[####----] 3 / 8 <unit> processed` style
pub fn progress_bar(len: u64, unit: &str) -> ProgressBar {
    let template = format!(
        "[{{bar:{}}}] {{pos}} / {{len}} {} processed",
        PROGRESS_BAR_WIDTH, unit
    );
    let style = ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    let bar = ProgressBar::new(len);
    bar.set_style(style);
    bar
}

/// Slice observer drawing an indicatif bar
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new() -> Self {
        Self {
            bar: progress_bar(0, "slices"),
        }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SliceObserver for ProgressBarObserver {
    fn on_slice(&mut self, progress: &SliceProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.completed as u64);
    }
}

/// Slice observer that only writes debug logs
#[derive(Debug, Default)]
pub struct LogObserver;

impl SliceObserver for LogObserver {
    fn on_slice(&mut self, progress: &SliceProgress) {
        debug!(
            "{} / {} slices processed ({} records{})",
            progress.completed,
            progress.total,
            progress.records,
            if progress.skipped { ", skipped" } else { "" }
        );
    }
}
