//! Per-timestep CSV frame export.
//!
//! Splits a written event table into one CSV file per distinct `t`, in
//! ascending time order. A frame that fails to write is logged and counted;
//! the remaining frames are still exported.

use super::parquet::{float_column, read_event_table};
use crate::utils::config::FRAME_COLUMNS;
use crate::utils::error::OutputError;
use arrow::array::{ArrayRef, Float64Array};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One exported row: `t, x, y, z, m, ityp`
type FrameRow = [f64; FRAME_COLUMNS.len()];

/// A frame that could not be written
#[derive(Debug, Clone, PartialEq)]
pub struct FailedFrame {
    pub frame: usize,
    pub time: f64,
    pub reason: String,
}

/// Result of a frame export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub frames: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedFrame>,
}

/// File name of one frame: `<prefix>_frame_<i>.csv`
pub fn frame_file_name(prefix: &str, frame: usize) -> String {
    format!("{}_frame_{}.csv", prefix, frame)
}

/// Export every timestep of a Parquet event table as its own CSV
///
/// **Public** - backs the `export` command
///
/// # Arguments
/// * `parquet_path` - Event table written by the parser
/// * `output_folder` - Created if missing
/// * `prefix` - File name prefix for every frame
/// * `on_frame` - Called with (frames done, frames total) after each frame
///
/// # Errors
/// Only failures that affect every frame: reading the table or creating the folder.
pub fn export_frames(
    parquet_path: impl AsRef<Path>,
    output_folder: impl AsRef<Path>,
    prefix: &str,
    on_frame: &mut dyn FnMut(usize, usize),
) -> Result<ExportSummary, OutputError> {
    let output_folder = output_folder.as_ref();

    let batches = read_event_table(parquet_path)?;
    let mut rows = collect_frame_rows(&batches)?;
    drop(batches);

    if !output_folder.is_dir() {
        std::fs::create_dir_all(output_folder)?;
        info!("Created output folder: {}", output_folder.display());
    }

    // Stable: rows sharing a time keep table order.
    rows.sort_by(|a, b| a[0].total_cmp(&b[0]));
    let groups: Vec<&[FrameRow]> = rows.chunk_by(|a, b| a[0] == b[0]).collect();

    let mut summary = ExportSummary {
        frames: groups.len(),
        ..ExportSummary::default()
    };
    info!("Starting CSV conversion of {} frames", summary.frames);

    for (frame, group) in groups.iter().enumerate() {
        let path = output_folder.join(frame_file_name(prefix, frame));
        match write_frame(group, &path) {
            Ok(()) => {
                debug!("Frame {} written to {}", frame, path.display());
                summary.written.push(path);
            }
            Err(e) => {
                warn!("Failed to create CSV for time slice {}: {}", group[0][0], e);
                summary.failed.push(FailedFrame {
                    frame,
                    time: group[0][0],
                    reason: e.to_string(),
                });
            }
        }
        on_frame(frame + 1, summary.frames);
    }

    info!(
        "Conversion completed: {} files created, {} failed",
        summary.written.len(),
        summary.failed.len()
    );
    Ok(summary)
}

/// Pull the frame columns out of every batch
///
/// **Private** - internal helper for export_frames
fn collect_frame_rows(batches: &[RecordBatch]) -> Result<Vec<FrameRow>, OutputError> {
    let mut rows = Vec::new();

    for batch in batches {
        let columns = FRAME_COLUMNS
            .iter()
            .map(|name| float_column(batch, name))
            .collect::<Result<Vec<_>, _>>()?;

        for i in 0..batch.num_rows() {
            let mut row = [0.0; FRAME_COLUMNS.len()];
            for (slot, column) in row.iter_mut().zip(&columns) {
                *slot = column.value(i);
            }
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Write one frame
///
/// **Private** - internal helper for export_frames
fn write_frame(rows: &[FrameRow], path: &Path) -> Result<(), OutputError> {
    let schema = Schema::new(
        FRAME_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    );

    let arrays: Vec<ArrayRef> = (0..FRAME_COLUMNS.len())
        .map(|c| Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r[c]))) as ArrayRef)
        .collect();

    let batch = RecordBatch::try_new(Arc::new(schema), arrays)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate_slices;
    use crate::output::parquet::write_event_table;
    use crate::parser::schema::{ColumnSet, ParticleRecord, Slice};
    use pretty_assertions::assert_eq;

    fn record(t: f64, x: f64) -> ParticleRecord {
        ParticleRecord {
            t,
            x,
            y: 0.0,
            z: 0.0,
            p0: 1.0,
            px: 0.1,
            py: 0.2,
            pz: 0.3,
            m: 0.5,
            ityp: 106.0,
            di3: 0.0,
            ch: 0.0,
            pcn: 0.0,
            ncoll: 0.0,
            ppt: 0.0,
            eta: 0.0,
            nev: 1,
        }
    }

    fn write_sample(path: &Path) {
        let table = aggregate_slices(
            1,
            vec![
                Slice {
                    index: 0,
                    separator: 0,
                    time: Some(5.0),
                    records: vec![record(5.0, 1.0), record(5.0, 2.0)],
                },
                Slice {
                    index: 1,
                    separator: 5,
                    time: Some(10.0),
                    records: vec![record(10.0, 3.0)],
                },
            ],
        );
        write_event_table(table, ColumnSet::Standard, path).unwrap();
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name("event2", 0), "event2_frame_0.csv");
    }

    #[test]
    fn test_export_frames() {
        let dir = tempfile::tempdir().unwrap();
        let parquet = dir.path().join("event.parquet");
        write_sample(&parquet);

        let out = dir.path().join("frames");
        let mut progress = Vec::new();
        let summary = export_frames(&parquet, &out, "event1", &mut |done, total| {
            progress.push((done, total))
        })
        .unwrap();

        assert_eq!(summary.frames, 2);
        assert_eq!(summary.written.len(), 2);
        assert!(summary.failed.is_empty());
        assert_eq!(progress, vec![(1, 2), (2, 2)]);

        let first = std::fs::read_to_string(out.join("event1_frame_0.csv")).unwrap();
        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines[0], "t,x,y,z,m,ityp");
        assert_eq!(lines.len(), 3);

        let second = std::fs::read_to_string(out.join("event1_frame_1.csv")).unwrap();
        assert_eq!(second.lines().count(), 2);
    }

    #[test]
    fn test_failed_frame_does_not_stop_export() {
        let dir = tempfile::tempdir().unwrap();
        let parquet = dir.path().join("event.parquet");
        write_sample(&parquet);

        let out = dir.path().join("frames");
        std::fs::create_dir_all(out.join("event1_frame_0.csv")).unwrap();

        let mut calls = 0;
        let summary = export_frames(&parquet, &out, "event1", &mut |_, _| calls += 1).unwrap();

        assert_eq!(summary.frames, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].frame, 0);
        assert_eq!(summary.failed[0].time, 5.0);
        assert_eq!(summary.written, vec![out.join("event1_frame_1.csv")]);
        assert_eq!(calls, 2);

        let second = std::fs::read_to_string(out.join("event1_frame_1.csv")).unwrap();
        assert_eq!(second.lines().count(), 2);
    }

    #[test]
    fn test_export_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_frames(
            dir.path().join("missing.parquet"),
            dir.path().join("frames"),
            "x",
            &mut |_, _| {},
        );
        assert!(result.is_err());
    }
}
