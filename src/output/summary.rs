//! JSON run summary writer.
//!
//! Optional sidecar describing what a `parse` run produced.

use crate::aggregator::SliceStats;
use crate::parser::header::CollisionParameters;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level run summary written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace that was parsed
    pub input: String,

    /// Event number that was extracted
    pub event_number: u32,

    /// Parquet table path, absent when no data was written
    pub output: Option<String>,

    pub parameters: CollisionParameters,

    /// Slices the event should contain
    pub slices_requested: usize,

    pub stats: SliceStats,

    /// Slices skipped under the lenient policy
    pub skipped_slices: Vec<SkippedSliceSummary>,

    /// Particles whose pseudorapidity was undefined
    pub undefined_eta: usize,

    /// Timestamp when the summary was generated
    pub generated_at: String,
}

/// A skipped slice, as recorded in the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSliceSummary {
    pub index: usize,
    pub separator_row: usize,
    pub reason: String,
}

/// Write a run summary to a JSON file
///
/// **Public** - main entry point for summary output
pub fn write_summary(summary: &RunSummary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing run summary to: {}", output_path.display());

    if output_path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    Ok(())
}

/// Read a run summary from a JSON file
///
/// **Public** - useful for tests and tooling
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<RunSummary, OutputError> {
    let file = File::open(input_path.as_ref())?;
    Ok(serde_json::from_reader(file)?)
}
