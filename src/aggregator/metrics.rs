//! Summary statistics for an event table.
//!
//! Used for the run log and the optional JSON run summary.

use super::event_table::EventSlices;
use log::debug;
use serde::{Deserialize, Serialize};

/// Multiplicity and time coverage of an event table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceStats {
    /// Number of slices in the table
    pub slice_count: usize,

    /// Number of particle records across all slices
    pub record_count: usize,

    /// Mean particles per slice
    pub mean_multiplicity: f64,

    /// Largest slice
    pub max_multiplicity: usize,

    /// Smallest slice
    pub min_multiplicity: usize,

    /// Earliest timestep time
    pub first_time: Option<f64>,

    /// Latest timestep time
    pub last_time: Option<f64>,
}

/// Calculate slice statistics
///
/// **Public** - main entry point for metrics calculation
pub fn calculate_slice_stats(table: &EventSlices) -> SliceStats {
    let slices = table.slices();
    if slices.is_empty() {
        return SliceStats::default();
    }

    let sizes: Vec<usize> = slices.iter().map(|s| s.len()).collect();
    let record_count: usize = sizes.iter().sum();
    let times: Vec<f64> = slices.iter().filter_map(|s| s.time).collect();

    debug!(
        "Calculating stats over {} slices ({} records)",
        slices.len(),
        record_count
    );

    SliceStats {
        slice_count: slices.len(),
        record_count,
        mean_multiplicity: record_count as f64 / slices.len() as f64,
        max_multiplicity: sizes.iter().copied().max().unwrap_or(0),
        min_multiplicity: sizes.iter().copied().min().unwrap_or(0),
        first_time: times.iter().copied().reduce(f64::min),
        last_time: times.iter().copied().reduce(f64::max),
    }
}

impl SliceStats {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        let span = match (self.first_time, self.last_time) {
            (Some(first), Some(last)) => format!("{} .. {} fm/c", first, last),
            _ => "n/a".to_string(),
        };
        format!(
            "Slices: {} | Records: {} | Mean: {:.1} | Min: {} | Max: {} | Time: {}",
            self.slice_count,
            self.record_count,
            self.mean_multiplicity,
            self.min_multiplicity,
            self.max_multiplicity,
            span
        )
    }
}
