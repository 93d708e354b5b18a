//! Trace loader.
//!
//! Reads a normalized file-14 trace into an index-addressable table of rows.
//! Fields stay as raw strings: row shapes differ between markers, headers,
//! separators and particles, so coercion happens later, per row type.
//!
//! The whole trace is held in memory. Memory use grows with the input file;
//! `load_with_limit` lets callers put a ceiling on it.

use crate::utils::error::LoadError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One line of the trace, split into whitespace-separated fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Split a line into fields. Returns `None` for blank lines.
    pub fn from_line(line: &str) -> Option<Self> {
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if fields.is_empty() {
            None
        } else {
            Some(Self { fields })
        }
    }

    pub fn field(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    // Never zero: blank lines do not become rows.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Read-only, ordered table of trace rows
///
/// Row indices are the handle every later stage uses for offset arithmetic.
/// Blank lines are skipped and do not take an index.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    rows: Vec<Row>,
}

impl Trace {
    /// Load a trace from a normalized text file
    ///
    /// **Public** - main entry point for loading
    ///
    /// # Errors
    /// * `LoadError::InputNotFound` - File does not exist
    /// * `LoadError::Io` - Any other read failure
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with_limit(path, None)
    }

    /// Load a trace, refusing files larger than `max_bytes`
    pub fn load_with_limit(
        path: impl AsRef<Path>,
        max_bytes: Option<u64>,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(LoadError::InputNotFound(path.to_path_buf()));
        }

        if let Some(limit) = max_bytes {
            let size = std::fs::metadata(path)?.len();
            if size > limit {
                return Err(LoadError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        info!("Loading trace from: {}", path.display());

        let file = File::open(path)?;
        let trace = Self::from_reader(BufReader::new(file))?;

        info!("Loaded {} rows", trace.len());
        Ok(trace)
    }

    /// Build a trace from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, std::io::Error> {
        let mut rows = Vec::new();
        let mut blank = 0usize;

        for line in reader.lines() {
            match Row::from_line(&line?) {
                Some(row) => rows.push(row),
                None => blank += 1,
            }
        }

        if blank > 0 {
            debug!("Skipped {} blank lines", blank);
        }

        Ok(Self { rows })
    }

    /// Build a trace from in-memory text
    pub fn from_text(text: &str) -> Self {
        Self {
            rows: text.lines().filter_map(Row::from_line).collect(),
        }
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_row_splits_fields() {
        let row = Row::from_line("209 5").unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.field(0), Some("209"));
        assert_eq!(row.field(1), Some("5"));
        assert_eq!(row.field(2), None);
    }

    #[test]
    fn test_blank_line_is_not_a_row() {
        assert!(Row::from_line("").is_none());
        assert!(Row::from_line("   ").is_none());
    }

    #[test]
    fn test_from_text_preserves_order_and_skips_blanks() {
        let trace = Trace::from_text("UQMD a b\n\n2 5\n1 2 3\n");
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.row(0).unwrap().field(0), Some("UQMD"));
        assert_eq!(trace.row(1).unwrap().field(0), Some("2"));
        assert_eq!(trace.row(2).unwrap().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Trace::load("/definitely/not/here.f14");
        assert!(matches!(result, Err(LoadError::InputNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "UQMD version: 30400").unwrap();
        writeln!(file, "1 5").unwrap();

        let trace = Trace::load(file.path()).unwrap();
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_load_with_limit_rejects_large_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "UQMD version: 30400 30400 output_file 14").unwrap();

        let result = Trace::load_with_limit(file.path(), Some(4));
        assert!(matches!(result, Err(LoadError::TooLarge { limit: 4, .. })));
    }
}
