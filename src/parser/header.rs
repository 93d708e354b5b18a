//! Parameter extractor.
//!
//! Reads the per-event collision parameters from the header rows that follow
//! an event marker, using the named offsets of the [`TraceLayout`].

use super::layout::{CollisionField, TraceLayout};
use super::trace::Trace;
use crate::utils::error::ParseError;
use log::info;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Simulation metadata of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionParameters {
    /// Total simulated time (fm/c)
    pub total_time: f64,

    /// Output timestep duration (fm/c)
    pub timestep: f64,

    /// Impact parameter (fm)
    pub impact_parameter: f64,

    pub projectile_mass: u32,
    pub projectile_charge: i32,
    pub target_mass: u32,
    pub target_charge: i32,
}

impl CollisionParameters {
    /// `floor(total_time / timestep)`
    pub fn slices_per_event(&self) -> usize {
        (self.total_time / self.timestep).floor() as usize
    }

    /// Index into the separator list where this event's timesteps begin
    ///
    /// `None` when the index does not fit in `usize`, which only happens for
    /// absurd `total_time / timestep` ratios.
    pub fn slice_start(&self, event_number: u32) -> Option<usize> {
        (event_number.saturating_sub(1) as usize).checked_mul(self.slices_per_event())
    }
}

/// Extract collision parameters for the event whose marker sits at `marker`
///
/// **Public** - second stage after boundary location
///
/// # Errors
/// * `ParseError::MissingField` - Header row or column absent
/// * `ParseError::NonNumeric` - Header value cannot be parsed
/// * `ParseError::UndeclaredField` - Layout has no offset for a required field
/// * `ParseError::InvalidTimestep` - Fewer than one slice per event
pub fn extract_collision_parameters(
    trace: &Trace,
    marker: usize,
    layout: &TraceLayout,
) -> Result<CollisionParameters, ParseError> {
    let params = CollisionParameters {
        total_time: read_field(trace, marker, layout, CollisionField::TotalTime)?,
        timestep: read_field(trace, marker, layout, CollisionField::Timestep)?,
        impact_parameter: read_field(trace, marker, layout, CollisionField::ImpactParameter)?,
        projectile_mass: read_field(trace, marker, layout, CollisionField::ProjectileMass)?,
        projectile_charge: read_field(trace, marker, layout, CollisionField::ProjectileCharge)?,
        target_mass: read_field(trace, marker, layout, CollisionField::TargetMass)?,
        target_charge: read_field(trace, marker, layout, CollisionField::TargetCharge)?,
    };

    let valid = params.total_time.is_finite()
        && params.timestep.is_finite()
        && params.timestep > 0.0
        && params.slices_per_event() >= 1;
    if !valid {
        return Err(ParseError::InvalidTimestep {
            total_time: params.total_time,
            timestep: params.timestep,
        });
    }

    info!("Collision parameters:");
    info!("  Total time:       {} fm/c", params.total_time);
    info!("  Timestep:         {} fm/c", params.timestep);
    info!("  Impact parameter: {} fm", params.impact_parameter);
    info!(
        "  Projectile:       A={} Z={}",
        params.projectile_mass, params.projectile_charge
    );
    info!(
        "  Target:           A={} Z={}",
        params.target_mass, params.target_charge
    );

    Ok(params)
}

/// Read and parse one named header field
///
/// **Private** - internal helper for extract_collision_parameters
fn read_field<T: FromStr>(
    trace: &Trace,
    marker: usize,
    layout: &TraceLayout,
    field: CollisionField,
) -> Result<T, ParseError> {
    let offset = layout
        .offset_of(field)
        .ok_or(ParseError::UndeclaredField(field.name()))?;
    let row = marker + offset.row;

    let raw = trace
        .row(row)
        .and_then(|r| r.field(offset.column))
        .ok_or_else(|| ParseError::MissingField {
            row,
            column: offset.column,
            field: field.name().to_string(),
        })?;

    raw.parse::<T>().map_err(|_| ParseError::NonNumeric {
        row,
        column: offset.column,
        value: raw.to_string(),
    })
}
