//! Trace parsing.
//!
//! This module handles:
//! - Normalizing raw file-14 whitespace
//! - Loading the trace into rows
//! - Locating event and timestep boundaries
//! - Reading per-event collision parameters
//! - Extracting per-timestep particle slices

pub mod boundaries;
pub mod event;
pub mod header;
pub mod layout;
pub mod normalize;
pub mod schema;
pub mod slice;
pub mod trace;

// Re-export main types
pub use boundaries::{locate_boundaries, Boundaries};
pub use event::{extract_event, EventExtraction};
pub use header::{extract_collision_parameters, CollisionParameters};
pub use layout::{CollisionField, FieldOffset, TraceLayout, COLLISION_FIELD_OFFSETS};
pub use normalize::{default_reduced_path, normalize_line, reduce_file};
pub use schema::{pseudorapidity, ColumnSet, ParticleColumn, ParticleRecord, Slice};
pub use slice::{
    extract_slices, EtaPolicy, ExtractOptions, NoopObserver, ParsePolicy, SkippedSlice,
    SliceExtraction, SliceObserver, SliceProgress,
};
pub use trace::{Row, Trace};
