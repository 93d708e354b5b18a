//! Export command implementation: one CSV frame per timestep.

use super::progress::progress_bar;
use crate::output::{export_frames, ExportSummary};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// Export a Parquet event table as CSV frames
///
/// **Public** - main entry point called from main.rs
///
/// Individual frame failures are reported in the summary, not as an error.
pub fn execute_export(
    input: &Path,
    output_folder: &Path,
    prefix: &str,
    show_progress: bool,
) -> Result<ExportSummary> {
    if prefix.is_empty() {
        anyhow::bail!("Frame prefix cannot be empty");
    }

    info!("Exporting frames from: {}", input.display());

    let summary = if show_progress {
        let bar = progress_bar(0, "frames");
        let summary = export_frames(input, output_folder, prefix, &mut |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        });
        bar.finish();
        summary
    } else {
        export_frames(input, output_folder, prefix, &mut |_, _| {})
    }
    .with_context(|| format!("Failed to export frames from {}", input.display()))?;

    for failed in &summary.failed {
        warn!(
            "Frame {} (t = {}) not written: {}",
            failed.frame, failed.time, failed.reason
        );
    }

    info!(
        "✓ {} of {} frames written to: {}",
        summary.written.len(),
        summary.frames,
        output_folder.display()
    );
    Ok(summary)
}
