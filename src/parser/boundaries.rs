//! Boundary locator.
//!
//! One linear pass over the trace records where events start and where each
//! timestep's particle block begins.

use super::layout::TraceLayout;
use super::trace::Trace;
use crate::utils::error::ParseError;
use log::debug;

/// Event marker and separator row indices, both strictly increasing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundaries {
    pub event_markers: Vec<usize>,
    pub separators: Vec<usize>,
}

impl Boundaries {
    pub fn event_count(&self) -> usize {
        self.event_markers.len()
    }

    /// Row index of the marker for a 1-based event number
    ///
    /// # Errors
    /// * `ParseError::OutOfRange` - event 0, or more events requested than the trace holds
    pub fn event_marker(&self, event_number: u32) -> Result<usize, ParseError> {
        let out_of_range = || ParseError::OutOfRange {
            requested: event_number,
            available: self.event_count(),
        };

        let index = (event_number as usize).checked_sub(1).ok_or_else(out_of_range)?;
        self.event_markers.get(index).copied().ok_or_else(out_of_range)
    }
}

/// Scan the trace once for event markers and separators
///
/// **Public** - first stage after loading
pub fn locate_boundaries(trace: &Trace, layout: &TraceLayout) -> Boundaries {
    let mut boundaries = Boundaries::default();

    for (index, row) in trace.rows().iter().enumerate() {
        if layout.is_event_marker(row) {
            boundaries.event_markers.push(index);
        } else if layout.is_separator(row) {
            boundaries.separators.push(index);
        }
    }

    debug!(
        "Found {} event markers and {} separators",
        boundaries.event_markers.len(),
        boundaries.separators.len()
    );

    boundaries
}
