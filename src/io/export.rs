//! CSV export for turbine results and wind fields.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::farm::TurbineResult;
use crate::field::Grid;

/// Column header for per-turbine CSV export.
const HEADER: &str = "turbine,x_m,y_m,effective_speed_ms,deficit_ms,\
                      waking_turbines,power_kw,rated_power_kw";

/// Exports per-turbine results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per turbine, in farm order.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `results` - Per-turbine results from a farm evaluation
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_turbines_csv(results: &[TurbineResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_turbines_csv(results, buf)
}

/// Writes per-turbine results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_turbines_csv(results: &[TurbineResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.index.to_string(),
            format!("{:.3}", r.x),
            format!("{:.3}", r.y),
            format!("{:.6}", r.effective_speed_ms),
            format!("{:.6}", r.deficit_ms),
            r.waking_turbines.to_string(),
            format!("{:.4}", r.power_kw),
            format!("{:.4}", r.rated_power_kw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a wind field to a headerless CSV file, one record per grid row.
///
/// The output can be loaded back with [`crate::io::field::read_field_csv`].
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_field_csv(grid: &Grid, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_field_csv(grid, io::BufWriter::new(file))
}

/// Writes a wind field as headerless CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_field_csv(grid: &Grid, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in grid.as_slice().chunks(grid.cols().max(1)) {
        wtr.write_record(row.iter().map(|v| format!("{v:.6}")))?;
    }
    wtr.flush()?;
    Ok(())
}
