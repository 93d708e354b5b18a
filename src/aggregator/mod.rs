//! Aggregation of extracted slices into one event table.
//!
//! This module transforms per-timestep slices into:
//! - A time-ordered event table (for the Parquet writer)
//! - Multiplicity statistics

pub mod event_table;
pub mod metrics;

// Re-export main types and functions
pub use event_table::{aggregate_slices, EventSlices};
pub use metrics::{calculate_slice_stats, SliceStats};
