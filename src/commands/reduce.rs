//! Reduce command implementation: whitespace normalization of a raw trace.

use crate::parser::normalize::{default_reduced_path, reduce_file};
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

/// Normalize `input`, writing to `output` or `<stem>_reduced.csv`
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Path of the normalized file
pub fn execute_reduce(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_reduced_path(input));

    let lines = reduce_file(input, &output)
        .with_context(|| format!("Failed to reduce {}", input.display()))?;

    info!("✓ Reduced {} lines into: {}", lines, output.display());
    Ok(output)
}
