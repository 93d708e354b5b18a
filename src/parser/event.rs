//! Whole-event extraction: boundaries, header and slices for one event number.

use super::boundaries::locate_boundaries;
use super::header::{extract_collision_parameters, CollisionParameters};
use super::slice::{extract_slices, ExtractOptions, SkippedSlice, SliceObserver};
use super::trace::Trace;
use crate::aggregator::{aggregate_slices, EventSlices};
use crate::utils::error::ParseError;
use log::{debug, info};

/// Everything extracted for one event
#[derive(Debug, Clone, PartialEq)]
pub struct EventExtraction {
    pub parameters: CollisionParameters,
    pub table: EventSlices,
    pub skipped: Vec<SkippedSlice>,
    pub undefined_eta: usize,

    /// Slices the event should contain, `floor(total_time / timestep)`
    pub slices_requested: usize,
}

/// Extract one event from a loaded trace
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `trace` - Loaded trace
/// * `event_number` - 1-based event number
/// * `options` - Layout and policies
/// * `observer` - Notified after every slice
///
/// # Errors
/// * `ParseError::OutOfRange` - Raised before any header or slice is read
/// * Any header error, and slice errors under the strict policy
pub fn extract_event(
    trace: &Trace,
    event_number: u32,
    options: &ExtractOptions,
    observer: &mut dyn SliceObserver,
) -> Result<EventExtraction, ParseError> {
    let boundaries = locate_boundaries(trace, &options.layout);
    let marker = boundaries.event_marker(event_number)?;
    debug!("Event {} starts at row {}", event_number, marker);

    let parameters = extract_collision_parameters(trace, marker, &options.layout)?;
    let slices_requested = parameters.slices_per_event();
    info!("Total slices to process: {}", slices_requested);

    let extraction = extract_slices(
        trace,
        &boundaries,
        &parameters,
        event_number,
        options,
        observer,
    )?;

    Ok(EventExtraction {
        parameters,
        table: aggregate_slices(event_number, extraction.slices),
        skipped: extraction.skipped,
        undefined_eta: extraction.undefined_eta,
        slices_requested,
    })
}
