use crate::output::get_table_info;
use crate::parser::schema::ColumnSet;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Inspect a Parquet event table
pub fn inspect_event_table(file_path: &Path) -> Result<()> {
    println!("Inspecting event table: {}", file_path.display());

    let info = get_table_info(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    println!("✓ Valid event table");
    println!("  Rows:      {}", info.rows);
    println!("  Columns:   {}", info.columns.join(", "));
    println!("  Timesteps: {}", info.timesteps);
    if let (Some(first), Some(last)) = (info.first_time, info.last_time) {
        println!("  Time:      {} .. {} fm/c", first, last);
    }
    let events: Vec<String> = info.events.iter().map(u32::to_string).collect();
    println!("  Events:    {}", events.join(", "));

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("UrQMD Trace Event Table Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        let standard: Vec<&str> = ColumnSet::Standard.columns().iter().map(|c| c.name()).collect();
        let full: Vec<&str> = ColumnSet::Full.columns().iter().map(|c| c.name()).collect();
        println!("Standard columns: {}", standard.join(", "));
        println!("Full columns:     {}", full.join(", "));
        println!();
        println!("  t, x, y, z: float64  - Time (fm/c) and position (fm)");
        println!("  p0..pz:     float64  - Four-momentum (GeV)");
        println!("  m:          float64  - Mass (GeV)");
        println!("  ityp:       float64  - Particle species");
        println!("  eta:        float64  - Pseudorapidity ln((p + pz) / (p - pz))");
        println!("  nev:        uint32   - Event number");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("UrQMD Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Table Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-timestep particle tables from UrQMD file-14 collision traces.");
}
