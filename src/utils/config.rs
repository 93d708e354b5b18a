//! Configuration and constants for the CLI.
//!
//! Everything here describes the UrQMD file-14 layout or a default the
//! commands fall back to when the user does not override it.

/// Current run-summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// First field of the row that opens every event in a file-14 trace
pub const EVENT_SENTINEL: &str = "UQMD";

// Column names of a particle row, in file order.
// `eta` and `nev` are placeholders in the raw file and always recomputed.
pub const RAW_COLUMNS: [&str; 17] = [
    "t", "x", "y", "z", "p0", "px", "py", "pz", "m", "ityp", "di3", "ch", "pcn", "ncoll", "ppt",
    "eta", "nev",
];

/// Number of leading particle-row fields that must be present (`t` through `ppt`)
pub const REQUIRED_PARTICLE_FIELDS: usize = 15;

/// A row with at most this many fields has no `y` column and marks a timestep boundary
pub const SEPARATOR_MAX_FIELDS: usize = 2;

/// Column of a separator row holding the particle count
pub const COUNT_COLUMN: usize = 0;

/// Column of a separator row holding the timestep time
pub const TIME_COLUMN: usize = 1;

/// Particles start this many rows after their separator (one collision-counter row sits between)
pub const PARTICLE_ROW_OFFSET: usize = 2;

/// Value stored in `eta` when the pseudorapidity is undefined and the sentinel policy is active
pub const DEFAULT_ETA_SENTINEL: f64 = -999.0;

/// Suffix appended to the input stem by the `reduce` command
pub const REDUCED_SUFFIX: &str = "_reduced.csv";

/// Columns written to each per-timestep CSV frame
pub const FRAME_COLUMNS: [&str; 6] = ["t", "x", "y", "z", "m", "ityp"];

/// Width of the CLI progress bars
pub const PROGRESS_BAR_WIDTH: u16 = 20;
