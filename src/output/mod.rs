//! Output writers for event tables, frames and run summaries.
//!
//! This module handles writing data to disk in various formats:
//! - Parquet event tables (atomically published)
//! - Per-timestep CSV frames
//! - JSON run summaries

pub mod frames;
pub mod parquet;
pub mod summary;

// Re-export main functions
pub use self::frames::{export_frames, frame_file_name, ExportSummary, FailedFrame};
pub use self::parquet::{
    build_record_batch, event_schema, get_table_info, read_event_table, write_event_table,
    TableInfo, WriteOutcome,
};
pub use self::summary::{read_summary, write_summary, RunSummary, SkippedSliceSummary};
