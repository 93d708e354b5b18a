//! Positional description of the file-14 format.
//!
//! The trace has no declared schema, so every position the parser relies on
//! lives here as data: the event sentinel, how a separator is recognised, and
//! the named (row offset, column) table for per-event collision parameters.

use super::trace::Row;
use crate::utils::config::{
    COUNT_COLUMN, EVENT_SENTINEL, PARTICLE_ROW_OFFSET, SEPARATOR_MAX_FIELDS, TIME_COLUMN,
};

/// Per-event collision parameter stored in the event header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionField {
    ProjectileMass,
    ProjectileCharge,
    TargetMass,
    TargetCharge,
    ImpactParameter,
    TotalTime,
    Timestep,
}

impl CollisionField {
    pub const ALL: [CollisionField; 7] = [
        CollisionField::ProjectileMass,
        CollisionField::ProjectileCharge,
        CollisionField::TargetMass,
        CollisionField::TargetCharge,
        CollisionField::ImpactParameter,
        CollisionField::TotalTime,
        CollisionField::Timestep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CollisionField::ProjectileMass => "projectile_mass",
            CollisionField::ProjectileCharge => "projectile_charge",
            CollisionField::TargetMass => "target_mass",
            CollisionField::TargetCharge => "target_charge",
            CollisionField::ImpactParameter => "impact_parameter",
            CollisionField::TotalTime => "total_time",
            CollisionField::Timestep => "timestep",
        }
    }
}

/// Position of a value relative to an event marker row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOffset {
    pub row: usize,
    pub column: usize,
}

impl FieldOffset {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Header offsets of a UrQMD file-14 event.
///
/// ```text
/// +1  projectile:  (mass, char)  197   79   target:  (mass, char)  197   79
/// +3  impact_parameter_real/min/max(fm):   1.51  0.00  3.00 ...
/// +5  event# 1 random seed: 1477219191 (auto) total_time(fm/c): 200 Delta(t)_O(fm/c): 5.000
/// ```
pub const COLLISION_FIELD_OFFSETS: [(CollisionField, FieldOffset); 7] = [
    (CollisionField::ProjectileMass, FieldOffset::new(1, 3)),
    (CollisionField::ProjectileCharge, FieldOffset::new(1, 4)),
    (CollisionField::TargetMass, FieldOffset::new(1, 8)),
    (CollisionField::TargetCharge, FieldOffset::new(1, 9)),
    (CollisionField::ImpactParameter, FieldOffset::new(3, 1)),
    (CollisionField::TotalTime, FieldOffset::new(5, 7)),
    (CollisionField::Timestep, FieldOffset::new(5, 9)),
];

/// Layout of a trace: everything the boundary, header and slice stages need to know
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLayout {
    /// First field of an event marker row
    pub event_sentinel: String,

    /// Rows with at most this many fields are timestep separators
    pub separator_max_fields: usize,

    /// Separator column holding the particle count
    pub count_column: usize,

    /// Separator column holding the timestep time, if any
    pub time_column: usize,

    /// Distance from a separator to its first particle row
    pub particle_row_offset: usize,

    /// Named header offsets relative to the event marker
    pub collision_offsets: Vec<(CollisionField, FieldOffset)>,
}

impl Default for TraceLayout {
    fn default() -> Self {
        Self {
            event_sentinel: EVENT_SENTINEL.to_string(),
            separator_max_fields: SEPARATOR_MAX_FIELDS,
            count_column: COUNT_COLUMN,
            time_column: TIME_COLUMN,
            particle_row_offset: PARTICLE_ROW_OFFSET,
            collision_offsets: COLLISION_FIELD_OFFSETS.to_vec(),
        }
    }
}

impl TraceLayout {
    pub fn offset_of(&self, field: CollisionField) -> Option<FieldOffset> {
        self.collision_offsets
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, offset)| *offset)
    }

    pub fn is_event_marker(&self, row: &Row) -> bool {
        row.field(0) == Some(self.event_sentinel.as_str())
    }

    pub fn is_separator(&self, row: &Row) -> bool {
        row.len() <= self.separator_max_fields
    }
}
