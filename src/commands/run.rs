//! Run command implementation.
//!
//! Chains the whole tool for one event:
//! 1. Reduces the raw trace
//! 2. Parses the event into `<parquet_folder>/<event_name>_<n>.parquet`
//! 3. Exports frames into `<csv_folder>` as `<event_name><n>_frame_<i>.csv`

use super::export::execute_export;
use super::parse::{execute_parse, validate_args, ParseArgs};
use super::reduce::execute_reduce;
use crate::output::WriteOutcome;
use crate::parser::schema::ColumnSet;
use crate::parser::slice::{EtaPolicy, ParsePolicy};
use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Raw (un-normalized) trace
    pub input: PathBuf,
    pub event_number: u32,
    pub event_name: String,
    pub parquet_folder: PathBuf,
    pub csv_folder: PathBuf,
    pub columns: ColumnSet,
    pub parse_policy: ParsePolicy,
    pub eta_policy: EtaPolicy,
    pub max_bytes: Option<u64>,
    pub show_progress: bool,
}

impl RunArgs {
    /// Parquet table path for this run
    pub fn parquet_path(&self) -> PathBuf {
        self.parquet_folder
            .join(format!("{}_{}.parquet", self.event_name, self.event_number))
    }

    /// Prefix shared by every exported frame
    pub fn frame_prefix(&self) -> String {
        format!("{}{}", self.event_name, self.event_number)
    }
}

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
pub fn execute_run(args: &RunArgs) -> Result<()> {
    if args.event_name.is_empty() {
        anyhow::bail!("Event name cannot be empty");
    }

    // Step 1: File reduction
    let reduced = execute_reduce(&args.input, None)?;

    // Step 2: Parsing and Parquet conversion
    let parse_args = ParseArgs {
        input: reduced,
        event_number: args.event_number,
        output: args.parquet_path(),
        columns: args.columns,
        parse_policy: args.parse_policy,
        eta_policy: args.eta_policy,
        max_bytes: args.max_bytes,
        summary: None,
        show_progress: args.show_progress,
    };
    validate_args(&parse_args)?;
    let report = execute_parse(&parse_args)?;

    // Step 3: CSV conversion
    match report.outcome {
        WriteOutcome::Written { path, .. } => {
            execute_export(&path, &args.csv_folder, &args.frame_prefix(), args.show_progress)?;
            info!("Run completed for event {}", args.event_number);
        }
        WriteOutcome::NoData => {
            warn!("Skipping CSV conversion: no data for event {}", args.event_number);
        }
    }

    Ok(())
}
