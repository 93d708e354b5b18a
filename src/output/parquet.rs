//! Parquet event table writer and reader.
//!
//! The writer takes ownership of the event table, turns it into one Arrow
//! record batch and writes it to a temporary file beside the destination.
//! The file is renamed into place only after the Parquet footer is written,
//! so a reader never sees a partial table at the final path.

use crate::aggregator::EventSlices;
use crate::parser::schema::{ColumnSet, ParticleColumn};
use crate::utils::error::OutputError;
use arrow::array::{Array, ArrayRef, Float64Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Outcome of a write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Table published at `path`
    Written {
        path: PathBuf,
        rows: usize,
        bytes: u64,
    },
    /// No slice was produced; nothing was written
    NoData,
}

/// Arrow schema for a column set
pub fn event_schema(columns: ColumnSet) -> Schema {
    let fields: Vec<Field> = columns
        .columns()
        .iter()
        .map(|column| match column {
            ParticleColumn::Nev => Field::new(column.name(), DataType::UInt32, false),
            _ => Field::new(column.name(), DataType::Float64, false),
        })
        .collect();
    Schema::new(fields)
}

/// Build one record batch holding the whole event table
///
/// **Public** - exposed for testing
pub fn build_record_batch(
    table: &EventSlices,
    columns: ColumnSet,
) -> Result<RecordBatch, OutputError> {
    let arrays: Vec<ArrayRef> = columns
        .columns()
        .iter()
        .map(|&column| -> ArrayRef {
            match column {
                ParticleColumn::Nev => {
                    Arc::new(UInt32Array::from_iter_values(table.records().map(|r| r.nev)))
                }
                _ => Arc::new(Float64Array::from_iter_values(
                    table
                        .records()
                        .map(|r| r.float_value(column).unwrap_or_default()),
                )),
            }
        })
        .collect();

    Ok(RecordBatch::try_new(
        Arc::new(event_schema(columns)),
        arrays,
    )?)
}

/// Write an event table to a Parquet file
///
/// **Public** - main entry point for table output
///
/// # Arguments
/// * `table` - Event table; consumed so its buffers are released on every exit path
/// * `columns` - Column set to persist
/// * `output_path` - Destination file
///
/// # Returns
/// `WriteOutcome::NoData` without touching the filesystem when no slice was
/// produced. Slices without particles still yield a zero-row table.
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty or a directory
/// * `OutputError::WriteFailed` / `Parquet` / `PublishFailed` - Underlying I/O failure
pub fn write_event_table(
    table: EventSlices,
    columns: ColumnSet,
    output_path: impl AsRef<Path>,
) -> Result<WriteOutcome, OutputError> {
    let output_path = output_path.as_ref();

    if table.slice_count() == 0 {
        info!("No data to save");
        return Ok(WriteOutcome::NoData);
    }

    info!("Writing event table to: {}", output_path.display());
    validate_output_path(output_path)?;

    let batch = build_record_batch(&table, columns)?;
    drop(table);

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        debug!("Creating parent directories: {}", dir.display());
        std::fs::create_dir_all(dir).map_err(|e| {
            OutputError::InvalidPath(format!("Cannot create directory {}: {}", dir.display(), e))
        })?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .build();

    let mut writer = ArrowWriter::try_new(tmp.as_file_mut(), batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    tmp.as_file().sync_all()?;

    let rows = batch.num_rows();
    drop(batch);

    tmp.persist(output_path)?;

    let bytes = std::fs::metadata(output_path)?.len();
    info!("Event table written successfully ({} rows, {} bytes)", rows, bytes);

    Ok(WriteOutcome::Written {
        path: output_path.to_path_buf(),
        rows,
        bytes,
    })
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read every record batch of a Parquet event table
///
/// **Public** - used by export, inspect and tests
pub fn read_event_table(input_path: impl AsRef<Path>) -> Result<Vec<RecordBatch>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading event table from: {}", input_path.display());

    let file = File::open(input_path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    debug!("Event table loaded: {} batches", batches.len());
    Ok(batches)
}

/// Borrow a `Float64` column by name
pub fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, OutputError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| OutputError::MissingColumn(name.to_string()))
}

/// Borrow the `nev` column
pub fn event_column(batch: &RecordBatch) -> Result<&UInt32Array, OutputError> {
    let name = ParticleColumn::Nev.name();
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
        .ok_or_else(|| OutputError::MissingColumn(name.to_string()))
}

/// Basic facts about a written event table
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<String>,
    pub timesteps: usize,
    pub first_time: Option<f64>,
    pub last_time: Option<f64>,
    pub events: Vec<u32>,
}

/// Summarize a Parquet event table
///
/// **Public** - backs the `inspect` command
pub fn get_table_info(input_path: impl AsRef<Path>) -> Result<TableInfo, OutputError> {
    let input_path = input_path.as_ref();
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(input_path)?)?;

    // Taken from the file schema so zero-row tables still report their columns
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let batches = builder.build()?.collect::<Result<Vec<_>, _>>()?;

    let mut times: Vec<f64> = Vec::new();
    let mut events: Vec<u32> = Vec::new();

    for batch in &batches {
        times.extend(float_column(batch, ParticleColumn::T.name())?.values().iter());
        events.extend(event_column(batch)?.values().iter());
    }

    let rows = times.len();
    times.sort_by(f64::total_cmp);
    times.dedup();
    events.sort_unstable();
    events.dedup();

    Ok(TableInfo {
        rows,
        columns,
        timesteps: times.len(),
        first_time: times.first().copied(),
        last_time: times.last().copied(),
        events,
    })
}
