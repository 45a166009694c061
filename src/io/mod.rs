//! CSV input and output for turbine results and wind fields.

pub mod export;
pub mod field;
