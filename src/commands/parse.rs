//! Parse command implementation.
//!
//! The parse command:
//! 1. Loads the normalized trace
//! 2. Locates boundaries, reads the event header and extracts its slices
//! 3. Aggregates the slices into one event table
//! 4. Writes the Parquet table (and optional JSON summary)

use super::progress::{LogObserver, ProgressBarObserver};
use crate::aggregator::{calculate_slice_stats, SliceStats};
use crate::output::{write_event_table, write_summary, RunSummary, SkippedSliceSummary, WriteOutcome};
use crate::parser::header::CollisionParameters;
use crate::parser::schema::ColumnSet;
use crate::parser::slice::{EtaPolicy, ExtractOptions, ParsePolicy, SliceObserver};
use crate::parser::{extract_event, Trace};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the parse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Normalized trace file
    pub input: PathBuf,

    /// 1-based event number to extract
    pub event_number: u32,

    /// Output path for the Parquet table
    pub output: PathBuf,

    /// Columns to persist
    pub columns: ColumnSet,

    /// Behaviour on a slice that fails to parse
    pub parse_policy: ParsePolicy,

    /// Behaviour on undefined pseudorapidity
    pub eta_policy: EtaPolicy,

    /// Refuse traces larger than this many bytes
    pub max_bytes: Option<u64>,

    /// Output path for a JSON run summary (optional)
    pub summary: Option<PathBuf>,

    /// Draw a progress bar while extracting
    pub show_progress: bool,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            event_number: 1,
            output: PathBuf::from("event_1.parquet"),
            columns: ColumnSet::Standard,
            parse_policy: ParsePolicy::Strict,
            eta_policy: EtaPolicy::default(),
            max_bytes: None,
            summary: None,
            show_progress: false,
        }
    }
}

/// What a parse run produced
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub outcome: WriteOutcome,
    pub parameters: CollisionParameters,
    pub stats: SliceStats,
    pub slices_requested: usize,
    pub skipped_slices: usize,
    pub undefined_eta: usize,
}

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or oversized input
/// * Event number out of range
/// * Header errors, and slice errors under the strict policy
/// * File write errors
///
/// An event without any particle is not an error: the report carries
/// `WriteOutcome::NoData` and nothing is written.
pub fn execute_parse(args: &ParseArgs) -> Result<ParseReport> {
    let start_time = Instant::now();

    info!(
        "Starting parsing of event {} from: {}",
        args.event_number,
        args.input.display()
    );

    // Step 1: Load trace
    info!("Step 1/4: Loading trace...");
    let trace = Trace::load_with_limit(&args.input, args.max_bytes)
        .with_context(|| format!("Failed to load trace {}", args.input.display()))?;

    // Step 2: Boundaries, header, slices
    info!("Step 2/4: Extracting event {}...", args.event_number);
    let options = ExtractOptions {
        parse_policy: args.parse_policy,
        eta_policy: args.eta_policy,
        ..ExtractOptions::default()
    };

    let extraction = if args.show_progress {
        let mut observer = ProgressBarObserver::new();
        let result = run_extraction(&trace, args.event_number, &options, &mut observer);
        observer.finish();
        result
    } else {
        run_extraction(&trace, args.event_number, &options, &mut LogObserver)
    }?;

    drop(trace);
    debug!("Trace released");

    // Step 3: Aggregate
    info!("Step 3/4: Aggregating slices...");
    let stats = calculate_slice_stats(&extraction.table);
    info!("Event table: {}", stats.summary());

    if !extraction.skipped.is_empty() {
        warn!(
            "{} of {} slices skipped",
            extraction.skipped.len(),
            extraction.slices_requested
        );
    }
    if extraction.undefined_eta > 0 {
        warn!(
            "{} particle(s) with momentum along the beam axis handled by the {:?} eta policy",
            extraction.undefined_eta, args.eta_policy
        );
    }

    let skipped_summaries: Vec<SkippedSliceSummary> = extraction
        .skipped
        .iter()
        .map(|s| SkippedSliceSummary {
            index: s.index,
            separator_row: s.separator,
            reason: s.error.to_string(),
        })
        .collect();

    // Step 4: Write
    info!("Step 4/4: Writing event table...");
    let outcome = write_event_table(extraction.table, args.columns, &args.output)
        .context("Failed to write event table")?;

    match &outcome {
        WriteOutcome::Written { path, .. } => info!("✓ Event table written to: {}", path.display()),
        WriteOutcome::NoData => warn!("No data: event {} produced no slices", args.event_number),
    }

    if let Some(summary_path) = &args.summary {
        let summary = RunSummary {
            version: SCHEMA_VERSION.to_string(),
            input: args.input.display().to_string(),
            event_number: args.event_number,
            output: match &outcome {
                WriteOutcome::Written { path, .. } => Some(path.display().to_string()),
                WriteOutcome::NoData => None,
            },
            parameters: extraction.parameters.clone(),
            slices_requested: extraction.slices_requested,
            stats: stats.clone(),
            skipped_slices: skipped_summaries,
            undefined_eta: extraction.undefined_eta,
            generated_at: chrono::Utc::now().to_rfc3339(),
        };
        write_summary(&summary, summary_path).context("Failed to write run summary")?;
        info!("✓ Summary written to: {}", summary_path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Parsing completed in {:.2}s", elapsed.as_secs_f64());

    Ok(ParseReport {
        outcome,
        parameters: extraction.parameters,
        stats,
        slices_requested: extraction.slices_requested,
        skipped_slices: extraction.skipped.len(),
        undefined_eta: extraction.undefined_eta,
    })
}

/// Run the extraction with context on failure
///
/// **Private** - internal helper for execute_parse
fn run_extraction(
    trace: &Trace,
    event_number: u32,
    options: &ExtractOptions,
    observer: &mut dyn SliceObserver,
) -> Result<crate::parser::EventExtraction> {
    extract_event(trace, event_number, options, observer)
        .with_context(|| format!("Failed to extract event {}", event_number))
}

/// Validate parse arguments
///
/// **Public** - can be called before execute_parse for early validation
pub fn validate_args(args: &ParseArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.event_number == 0 {
        anyhow::bail!("Event numbers start at 1");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if let EtaPolicy::Sentinel(value) = args.eta_policy {
        if !value.is_finite() {
            anyhow::bail!("Eta sentinel must be a finite number");
        }
    }

    if args.max_bytes == Some(0) {
        anyhow::bail!("max_bytes must be greater than 0");
    }

    Ok(())
}
