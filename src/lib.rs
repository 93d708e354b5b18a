//! UrQMD Trace
//!
//! Converts UrQMD "file 14" collision traces into per-timestep
//! particle tables.
//!
//! This crate provides the core implementation for the
//! `urqmd-trace` CLI tool:
//!
//! - [`parser`] locates event and timestep boundaries, reads the event
//!   header and extracts particle slices with derived pseudorapidity
//! - [`aggregator`] joins the slices of one event in time order
//! - [`output`] writes Parquet tables, CSV frames and JSON summaries
//!
//! The whole trace is loaded into memory, so memory use grows with the
//! size of the input file.
//!
//! ## Getting Started
//!
//! ```bash
//! urqmd-trace reduce urqmd_1_14.f14
//! urqmd-trace parse urqmd_1_14_reduced.csv --event 2 --output event_2.parquet
//! urqmd-trace export event_2.parquet --output-folder frames --prefix event2
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
