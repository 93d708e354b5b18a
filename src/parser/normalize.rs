//! Whitespace normalizer.
//!
//! Raw file-14 output pads its columns with runs of spaces. The loader expects
//! single-space separated fields, so traces are reduced line by line first.

use crate::utils::config::REDUCED_SUFFIX;
use crate::utils::error::LoadError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Collapse internal whitespace to single spaces and trim both ends
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Default output path: `<dir>/<stem>_reduced.csv`
pub fn default_reduced_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", stem, REDUCED_SUFFIX))
}

/// Normalize a whole file
///
/// **Public** - backs the `reduce` command
///
/// Line count is preserved 1:1. Output goes to a temporary file next to the
/// destination and is renamed into place once complete.
///
/// # Returns
/// Number of lines written
pub fn reduce_file(input: &Path, output: &Path) -> Result<usize, LoadError> {
    if !input.is_file() {
        return Err(LoadError::InputNotFound(input.to_path_buf()));
    }

    info!("Starting file reduction for: {}", input.display());

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        debug!("Creating parent directories: {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }

    let reader = BufReader::new(File::open(input)?);
    let tmp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(tmp);
    let mut lines = 0usize;

    for line in reader.lines() {
        writeln!(writer, "{}", normalize_line(&line?))?;
        lines += 1;
    }

    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    tmp.persist(output).map_err(|e| e.error)?;

    info!("Finished processing {} lines", lines);
    info!("Output saved to: {}", output.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line() {
        assert_eq!(
            normalize_line("   209      5   "),
            "209 5".to_string()
        );
        assert_eq!(normalize_line("a\t\tb  c"), "a b c".to_string());
        assert_eq!(normalize_line("   "), String::new());
    }

    #[test]
    fn test_normalize_line_idempotent() {
        let once = normalize_line("  UQMD   version:    30400   30400  output_file  14 ");
        assert_eq!(normalize_line(&once), once);
    }

    #[test]
    fn test_default_reduced_path() {
        assert_eq!(
            default_reduced_path(Path::new("/data/urqmd_1_14.f14")),
            PathBuf::from("/data/urqmd_1_14_reduced.csv")
        );
    }

    #[test]
    fn test_reduce_file_preserves_line_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trace.f14");
        std::fs::write(&input, "  UQMD   version:  30400\n\n   2    5\n").unwrap();

        let output = dir.path().join("out/trace_reduced.csv");
        let lines = reduce_file(&input, &output).unwrap();

        assert_eq!(lines, 3);
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content, "UQMD version: 30400\n\n2 5\n");
    }

    #[test]
    fn test_reduce_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = reduce_file(&dir.path().join("nope"), &dir.path().join("out"));
        assert!(matches!(result, Err(LoadError::InputNotFound(_))));
    }
}
