//! Slice extractor.
//!
//! For each timestep of the requested event, reads the particle block that
//! follows a separator, coerces it to numbers and adds the derived fields.
//! Progress is reported through a [`SliceObserver`] so the extraction itself
//! stays free of presentation concerns.

use super::boundaries::Boundaries;
use super::header::CollisionParameters;
use super::layout::TraceLayout;
use super::schema::{pseudorapidity, ParticleRecord, Slice};
use super::trace::{Row, Trace};
use crate::utils::config::{DEFAULT_ETA_SENTINEL, RAW_COLUMNS, REQUIRED_PARTICLE_FIELDS};
use crate::utils::error::ParseError;
use log::{debug, warn};

/// What to do when a slice fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Abort the run on the first bad slice
    #[default]
    Strict,
    /// Skip the bad slice and carry on with the next separator
    Lenient,
}

/// What to do with a particle whose pseudorapidity is undefined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EtaPolicy {
    /// Store this value in `eta`
    Sentinel(f64),
    /// Leave the particle out of its slice
    Drop,
    /// Fail the slice with `ParseError::UndefinedEta`
    Error,
}

impl Default for EtaPolicy {
    fn default() -> Self {
        EtaPolicy::Sentinel(DEFAULT_ETA_SENTINEL)
    }
}

/// Options shared by every stage of an extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    pub layout: TraceLayout,
    pub parse_policy: ParsePolicy,
    pub eta_policy: EtaPolicy,
}

/// Progress notification sent after every slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceProgress {
    /// Slices handled so far, including skipped ones
    pub completed: usize,

    /// Slices the event should contain
    pub total: usize,

    /// Records in the slice just handled
    pub records: usize,

    /// The slice was skipped under the lenient policy
    pub skipped: bool,
}

/// Receives progress notifications; must not affect the extraction
pub trait SliceObserver {
    fn on_slice(&mut self, progress: &SliceProgress);
}

impl<F: FnMut(&SliceProgress)> SliceObserver for F {
    fn on_slice(&mut self, progress: &SliceProgress) {
        self(progress)
    }
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SliceObserver for NoopObserver {
    fn on_slice(&mut self, _progress: &SliceProgress) {}
}

/// A slice dropped under the lenient policy
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSlice {
    pub index: usize,
    pub separator: usize,
    pub error: ParseError,
}

/// Result of extracting every slice of one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceExtraction {
    pub slices: Vec<Slice>,
    pub skipped: Vec<SkippedSlice>,

    /// Particles whose pseudorapidity was undefined (replaced, dropped or fatal)
    pub undefined_eta: usize,
}

/// Extract the slices of one event
///
/// **Public** - core of the parser
///
/// Walks `params.slices_per_event()` separators starting at
/// `params.slice_start(event_number)`. Stops early, with a warning, when the
/// trace runs out of separators.
///
/// # Errors
/// `ParseError::InvalidTimestep` when the event's first separator index
/// overflows. Under `ParsePolicy::Strict`, the first slice error is returned.
/// Under `ParsePolicy::Lenient`, slice errors are collected in `skipped`.
pub fn extract_slices(
    trace: &Trace,
    boundaries: &Boundaries,
    params: &CollisionParameters,
    event_number: u32,
    options: &ExtractOptions,
    observer: &mut dyn SliceObserver,
) -> Result<SliceExtraction, ParseError> {
    let total = params.slices_per_event();
    let start = params
        .slice_start(event_number)
        .ok_or(ParseError::InvalidTimestep {
            total_time: params.total_time,
            timestep: params.timestep,
        })?;
    let separators = boundaries.separators.get(start..).unwrap_or(&[]);

    if separators.len() < total {
        warn!(
            "Event {} needs {} slices but only {} separators remain",
            event_number,
            total,
            separators.len()
        );
    }

    let mut extraction = SliceExtraction::default();

    for (index, &separator) in separators.iter().take(total).enumerate() {
        let records = match extract_slice(trace, separator, index, event_number, options) {
            Ok((slice, undefined)) => {
                extraction.undefined_eta += undefined;
                let records = slice.len();
                extraction.slices.push(slice);
                Some(records)
            }
            Err(error) => {
                if let ParseError::UndefinedEta { .. } = error {
                    extraction.undefined_eta += 1;
                }
                match options.parse_policy {
                    ParsePolicy::Strict => return Err(error),
                    ParsePolicy::Lenient => {
                        warn!("Skipping slice {} (separator row {}): {}", index, separator, error);
                        extraction.skipped.push(SkippedSlice {
                            index,
                            separator,
                            error,
                        });
                        None
                    }
                }
            }
        };

        observer.on_slice(&SliceProgress {
            completed: index + 1,
            total,
            records: records.unwrap_or(0),
            skipped: records.is_none(),
        });
    }

    debug!(
        "Extracted {} slices, skipped {}",
        extraction.slices.len(),
        extraction.skipped.len()
    );

    Ok(extraction)
}

/// Extract the particle block opened by one separator
///
/// **Public** - exposed for testing a single timestep
///
/// Returns the slice and the number of particles with undefined pseudorapidity.
pub fn extract_slice(
    trace: &Trace,
    separator: usize,
    index: usize,
    event_number: u32,
    options: &ExtractOptions,
) -> Result<(Slice, usize), ParseError> {
    let layout = &options.layout;
    let separator_row = trace.row(separator).ok_or_else(|| ParseError::MissingField {
        row: separator,
        column: layout.count_column,
        field: "separator".to_string(),
    })?;

    let count_raw = separator_row
        .field(layout.count_column)
        .ok_or_else(|| ParseError::MissingField {
            row: separator,
            column: layout.count_column,
            field: "particle count".to_string(),
        })?;
    let count: usize = count_raw.parse().map_err(|_| ParseError::NonNumeric {
        row: separator,
        column: layout.count_column,
        value: count_raw.to_string(),
    })?;

    let first = separator + layout.particle_row_offset;
    let available = trace.len().saturating_sub(first);
    if available < count {
        return Err(ParseError::Truncated {
            separator,
            expected: count,
            available,
        });
    }

    let mut records = Vec::with_capacity(count);
    let mut undefined = 0usize;

    for (offset, row) in trace.rows()[first..first + count].iter().enumerate() {
        let row_index = first + offset;
        let mut record = parse_particle_row(row, row_index, event_number)?;

        match pseudorapidity(record.px, record.py, record.pz) {
            Some(eta) => record.eta = eta,
            None => {
                undefined += 1;
                match options.eta_policy {
                    EtaPolicy::Sentinel(value) => record.eta = value,
                    EtaPolicy::Drop => continue,
                    EtaPolicy::Error => return Err(ParseError::UndefinedEta { row: row_index }),
                }
            }
        }

        records.push(record);
    }

    if undefined > 0 {
        debug!(
            "Slice {}: {} particle(s) with undefined pseudorapidity",
            index, undefined
        );
    }

    let time = records.first().map(|r| r.t).or_else(|| {
        separator_row
            .field(layout.time_column)
            .and_then(|raw| raw.parse::<f64>().ok())
    });

    if let Some(t) = time {
        if records.iter().any(|r| r.t != t) {
            warn!("Slice {} mixes particle times", index);
        }
    }

    Ok((
        Slice {
            index,
            separator,
            time,
            records,
        },
        undefined,
    ))
}

/// Coerce one particle row to a record
///
/// Every present field must be numeric. The first fifteen (`t` .. `ppt`) are
/// required; the `eta`/`nev` placeholders are checked but discarded. Rows with
/// more than `RAW_COLUMNS.len()` fields are rejected.
///
/// **Public** - exposed for testing
pub fn parse_particle_row(
    row: &Row,
    row_index: usize,
    event_number: u32,
) -> Result<ParticleRecord, ParseError> {
    if row.len() > RAW_COLUMNS.len() {
        return Err(ParseError::ExtraFields {
            row: row_index,
            count: row.len(),
            max: RAW_COLUMNS.len(),
        });
    }

    let values = row
        .fields()
        .iter()
        .enumerate()
        .map(|(column, raw)| {
            raw.parse::<f64>().map_err(|_| ParseError::NonNumeric {
                row: row_index,
                column,
                value: raw.clone(),
            })
        })
        .collect::<Result<Vec<f64>, ParseError>>()?;

    if values.len() < REQUIRED_PARTICLE_FIELDS {
        return Err(ParseError::MissingField {
            row: row_index,
            column: values.len(),
            field: RAW_COLUMNS[values.len()].to_string(),
        });
    }

    Ok(ParticleRecord {
        t: values[0],
        x: values[1],
        y: values[2],
        z: values[3],
        p0: values[4],
        px: values[5],
        py: values[6],
        pz: values[7],
        m: values[8],
        ityp: values[9],
        di3: values[10],
        ch: values[11],
        pcn: values[12],
        ncoll: values[13],
        ppt: values[14],
        eta: 0.0,
        nev: event_number,
    })
}
