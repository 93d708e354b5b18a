//! UrQMD Trace CLI
//!
//! Turns UrQMD file-14 traces into per-timestep particle tables.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use urqmd_trace::commands::{
    display_schema, display_version, execute_export, execute_parse, execute_reduce, execute_run,
    inspect_event_table, validate_args, ParseArgs, RunArgs,
};
use urqmd_trace::output::WriteOutcome;
use urqmd_trace::parser::{ColumnSet, EtaPolicy, ParsePolicy};
use urqmd_trace::utils::config::DEFAULT_ETA_SENTINEL;

/// UrQMD Trace - per-timestep particle tables from collision traces
#[derive(Parser, Debug)]
#[command(name = "urqmd-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Collapse whitespace in a raw trace
    Reduce {
        /// Raw trace file
        input: PathBuf,

        /// Output path (defaults to <stem>_reduced.csv next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract one event into a Parquet table
    Parse {
        /// Normalized trace file
        input: PathBuf,

        /// Event number to extract (starting at 1)
        #[arg(short, long)]
        event: u32,

        /// Output path for the Parquet table
        #[arg(short, long)]
        output: PathBuf,

        /// Output path for a JSON run summary
        #[arg(long)]
        summary: Option<PathBuf>,

        #[command(flatten)]
        extraction: ExtractionOpts,
    },

    /// Split a Parquet table into one CSV per timestep
    Export {
        /// Parquet event table
        input: PathBuf,

        /// Folder for the CSV frames
        #[arg(short, long)]
        output_folder: PathBuf,

        /// File name prefix for every frame
        #[arg(short, long)]
        prefix: String,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Reduce, parse and export one event in a single go
    Run {
        /// Raw trace file
        input: PathBuf,

        /// Event number to extract (starting at 1)
        #[arg(short, long)]
        event: u32,

        /// Name used for output files
        #[arg(long, default_value = "event")]
        event_name: String,

        /// Folder for the Parquet table
        #[arg(long, default_value = "output_parquet_files")]
        parquet_folder: PathBuf,

        /// Folder for the CSV frames
        #[arg(long, default_value = "output_csv_files")]
        csv_folder: PathBuf,

        #[command(flatten)]
        extraction: ExtractionOpts,
    },

    /// Print facts about a Parquet event table
    Inspect {
        /// Path to the Parquet table
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

/// Options shared by `parse` and `run`
#[derive(Args, Debug)]
struct ExtractionOpts {
    /// What to do with a slice that fails to parse
    #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
    policy: PolicyArg,

    /// What to do with a particle whose pseudorapidity is undefined
    #[arg(long, value_enum, default_value_t = EtaArg::Sentinel)]
    eta_policy: EtaArg,

    /// Value stored by the sentinel eta policy
    #[arg(long, default_value_t = DEFAULT_ETA_SENTINEL, allow_negative_numbers = true)]
    eta_sentinel: f64,

    /// Keep every raw column instead of t, x, y, z, m, ityp, eta, nev
    #[arg(long)]
    full_columns: bool,

    /// Refuse input files larger than this many bytes
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    /// Abort on the first bad slice
    Strict,
    /// Skip bad slices and continue
    Lenient,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EtaArg {
    /// Store --eta-sentinel
    Sentinel,
    /// Drop the particle
    Drop,
    /// Fail the slice
    Error,
}

impl ExtractionOpts {
    fn parse_policy(&self) -> ParsePolicy {
        match self.policy {
            PolicyArg::Strict => ParsePolicy::Strict,
            PolicyArg::Lenient => ParsePolicy::Lenient,
        }
    }

    fn eta_policy(&self) -> EtaPolicy {
        match self.eta_policy {
            EtaArg::Sentinel => EtaPolicy::Sentinel(self.eta_sentinel),
            EtaArg::Drop => EtaPolicy::Drop,
            EtaArg::Error => EtaPolicy::Error,
        }
    }

    fn columns(&self) -> ColumnSet {
        if self.full_columns {
            ColumnSet::Full
        } else {
            ColumnSet::Standard
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Reduce { input, output } => {
            execute_reduce(&input, output.as_deref())?;
        }

        Commands::Parse {
            input,
            event,
            output,
            summary,
            extraction,
        } => {
            let args = ParseArgs {
                input,
                event_number: event,
                output,
                columns: extraction.columns(),
                parse_policy: extraction.parse_policy(),
                eta_policy: extraction.eta_policy(),
                max_bytes: extraction.max_bytes,
                summary,
                show_progress: !extraction.no_progress,
            };

            // Validate args first
            validate_args(&args)?;

            let report = execute_parse(&args)?;
            if report.outcome == WriteOutcome::NoData {
                println!("No data to save.");
            }
        }

        Commands::Export {
            input,
            output_folder,
            prefix,
            no_progress,
        } => {
            let summary = execute_export(&input, &output_folder, &prefix, !no_progress)?;
            println!(
                "Conversion completed: {} files created, {} failed.",
                summary.written.len(),
                summary.failed.len()
            );
        }

        Commands::Run {
            input,
            event,
            event_name,
            parquet_folder,
            csv_folder,
            extraction,
        } => {
            let args = RunArgs {
                input,
                event_number: event,
                event_name,
                parquet_folder,
                csv_folder,
                columns: extraction.columns(),
                parse_policy: extraction.parse_policy(),
                eta_policy: extraction.eta_policy(),
                max_bytes: extraction.max_bytes,
                show_progress: !extraction.no_progress,
            };
            execute_run(&args)?;
        }

        Commands::Inspect { file } => {
            inspect_event_table(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
