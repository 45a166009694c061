//! Ambient wind-field loading.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{WakeError, WakeResult};
use crate::field::Grid;

/// Reads a headerless CSV wind field from `path`.
///
/// Each record is one grid row (flow axis), each column one lateral cell.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a cell is not a number,
/// or the rows are ragged.
pub fn read_field_csv(path: &Path) -> WakeResult<Grid> {
    let file = File::open(path)?;
    read_field(io::BufReader::new(file))
}

/// Reads a headerless CSV wind field from any reader.
///
/// # Errors
///
/// Returns an error if a record cannot be read, a cell is not a number,
/// or the rows are ragged.
pub fn read_field(reader: impl Read) -> WakeResult<Grid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (y, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(x, cell)| {
                cell.parse::<f64>().map_err(|e| {
                    WakeError::invalid(
                        "ambient_field",
                        format!("row {y}, column {x}: \"{cell}\" is not a number ({e})"),
                    )
                })
            })
            .collect::<WakeResult<Vec<_>>>()?;
        rows.push(row);
    }
    Grid::from_rows(rows)
}
