//! Grid-resolution wake field for layout fitness evaluation.

/// Wake stamping, effective field, and energy estimate.
pub mod engine;
/// Row-major scalar field.
pub mod grid;

pub use engine::{
    FieldEvaluation, GridCoord, WakeFieldParams, effective_field, evaluate_field, farm_energy,
    stamp_wakes,
};
pub use grid::Grid;
