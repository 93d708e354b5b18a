//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod export;
pub mod parse;
pub mod progress;
pub mod reduce;
pub mod run;
pub mod utils;

// Re-export main command functions
pub use export::execute_export;
pub use parse::{execute_parse, validate_args, ParseArgs, ParseReport};
pub use reduce::execute_reduce;
pub use run::{execute_run, RunArgs};
pub use utils::{display_schema, display_version, inspect_event_table};
