//! Grid-resolution Jensen wake model.
//!
//! Each turbine stamps its wake footprint onto a deficit field; overlapping
//! footprints combine by elementwise maximum. This is a separate algorithm
//! from the point model in [`crate::farm`]: deficits scale with the ambient
//! speed at the source cell rather than a global free stream, and overlaps
//! take the maximum rather than the root-sum-square.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::grid::Grid;
use crate::error::{WakeError, WakeResult, ensure_finite, ensure_positive, ensure_thrust_coefficient};
use crate::wake::{velocity_deficit_fraction, wake_radius};

/// A turbine placed on a grid cell (column `x`, row `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Turbine and wake parameters shared by every turbine in the grid model.
///
/// Lengths are in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WakeFieldParams {
    rotor_diameter: f64,
    thrust_coefficient: f64,
    wake_expansion: f64,
}

impl Default for WakeFieldParams {
    fn default() -> Self {
        Self {
            rotor_diameter: 100.0,
            thrust_coefficient: 0.8,
            wake_expansion: 0.04,
        }
    }
}

impl WakeFieldParams {
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive diameter or expansion
    /// coefficient, or a thrust coefficient outside `[0, 1)`.
    pub fn new(rotor_diameter: f64, thrust_coefficient: f64, wake_expansion: f64) -> WakeResult<Self> {
        Ok(Self {
            rotor_diameter: ensure_positive("rotor_diameter", rotor_diameter)?,
            thrust_coefficient: ensure_thrust_coefficient(thrust_coefficient)?,
            wake_expansion: ensure_positive("wake_expansion", wake_expansion)?,
        })
    }

    pub fn rotor_diameter(&self) -> f64 {
        self.rotor_diameter
    }

    pub fn rotor_radius(&self) -> f64 {
        self.rotor_diameter / 2.0
    }

    pub fn thrust_coefficient(&self) -> f64 {
        self.thrust_coefficient
    }

    pub fn wake_expansion(&self) -> f64 {
        self.wake_expansion
    }
}

/// Deficit field, effective field, and energy estimate for one layout.
#[derive(Debug, Clone, Serialize)]
pub struct FieldEvaluation {
    /// Stamped velocity deficit per cell (m/s).
    pub deficit: Grid,
    /// Ambient minus deficit, clamped at zero (m/s).
    pub effective: Grid,
    /// Σ effective³ over turbine cells. A relative fitness signal, not kW.
    pub energy: f64,
}

fn check_coords(ambient: &Grid, turbines: &[GridCoord]) -> WakeResult<()> {
    for (i, t) in turbines.iter().enumerate() {
        if !ambient.contains(t.y, t.x) {
            return Err(WakeError::invalid(
                "turbine_coordinate",
                format!(
                    "turbine {i} at (x={}, y={}) lies outside the {}x{} field",
                    t.x,
                    t.y,
                    ambient.cols(),
                    ambient.rows()
                ),
            ));
        }
    }
    Ok(())
}

fn check_ambient(ambient: &Grid) -> WakeResult<()> {
    if ambient.is_empty() {
        return Err(WakeError::invalid("ambient_field", "must contain at least one cell"));
    }
    for (i, &v) in ambient.as_slice().iter().enumerate() {
        let v = ensure_finite("ambient_field", v)?;
        if v < 0.0 {
            return Err(WakeError::invalid(
                "ambient_field",
                format!(
                    "wind speeds must be >= 0, found {v} at row {}, column {}",
                    i / ambient.cols(),
                    i % ambient.cols()
                ),
            ));
        }
    }
    Ok(())
}

/// Stamps one turbine's wake onto `acc` with the maximum rule.
fn stamp_turbine(
    ambient: &Grid,
    turbine: GridCoord,
    params: &WakeFieldParams,
    acc: &mut Grid,
) -> WakeResult<()> {
    let Some(u0) = ambient.get(turbine.y, turbine.x) else {
        return Ok(());
    };
    let r0 = params.rotor_radius();
    let k = params.wake_expansion;
    let last_col = ambient.cols() - 1;

    for y in turbine.y + 1..ambient.rows() {
        let dy = (y - turbine.y) as f64;
        // integer lateral offsets inside the cone: |dx| <= floor(r)
        let half_width = wake_radius(dy, r0, k).floor() as usize;
        let deficit = velocity_deficit_fraction(dy, params.thrust_coefficient, r0, k)? * u0;

        let lo = turbine.x.saturating_sub(half_width);
        let hi = turbine.x.saturating_add(half_width).min(last_col);
        for cell in &mut acc.row_mut(y)[lo..=hi] {
            *cell = cell.max(deficit);
        }
    }
    Ok(())
}

/// Builds the wake deficit field for a set of turbine cells.
///
/// Turbines are stamped in parallel into private buffers that are merged
/// with the maximum rule, so the result does not depend on turbine order or
/// thread count.
///
/// # Errors
///
/// Returns `InvalidParameter` if the ambient field has negative speeds or a
/// turbine lies outside the field.
pub fn stamp_wakes(ambient: &Grid, turbines: &[GridCoord], params: &WakeFieldParams) -> WakeResult<Grid> {
    check_ambient(ambient)?;
    check_coords(ambient, turbines)?;

    let (rows, cols) = (ambient.rows(), ambient.cols());
    turbines
        .par_iter()
        .try_fold(
            || Grid::zeros(rows, cols),
            |mut acc, &t| -> WakeResult<Grid> {
                stamp_turbine(ambient, t, params, &mut acc)?;
                Ok(acc)
            },
        )
        .try_reduce(
            || Grid::zeros(rows, cols),
            |mut a, b| -> WakeResult<Grid> {
                a.max_assign(&b);
                Ok(a)
            },
        )
}

/// Effective wind field: `max(ambient − deficit, 0)` per cell.
///
/// # Errors
///
/// Returns `InvalidParameter` if the ambient field is empty, holds negative
/// or non-finite speeds, or the two fields differ in shape.
pub fn effective_field(ambient: &Grid, deficit: &Grid) -> WakeResult<Grid> {
    check_ambient(ambient)?;
    if !ambient.same_shape(deficit) {
        return Err(WakeError::invalid(
            "deficit_field",
            format!(
                "shape {}x{} does not match ambient {}x{}",
                deficit.rows(),
                deficit.cols(),
                ambient.rows(),
                ambient.cols()
            ),
        ));
    }
    let rows = ambient
        .as_slice()
        .chunks(ambient.cols())
        .zip(deficit.as_slice().chunks(deficit.cols()))
        .map(|(w, d)| w.iter().zip(d).map(|(w, d)| (w - d).max(0.0)).collect())
        .collect();
    Grid::from_rows(rows)
}

/// Energy estimate: Σ over turbine cells of `effective³`, with no rated cap.
///
/// # Errors
///
/// Returns `InvalidParameter` if a turbine lies outside the field.
pub fn farm_energy(effective: &Grid, turbines: &[GridCoord]) -> WakeResult<f64> {
    check_coords(effective, turbines)?;
    Ok(turbines
        .iter()
        .filter_map(|t| effective.get(t.y, t.x))
        .map(|u| u * u * u)
        .sum())
}

/// Runs the full grid pipeline for one layout.
///
/// # Errors
///
/// Propagates validation errors from [`stamp_wakes`].
pub fn evaluate_field(
    ambient: &Grid,
    turbines: &[GridCoord],
    params: &WakeFieldParams,
) -> WakeResult<FieldEvaluation> {
    let deficit = stamp_wakes(ambient, turbines, params)?;
    let effective = effective_field(ambient, &deficit)?;
    let energy = farm_energy(&effective, turbines)?;
    debug!(
        turbines = turbines.len(),
        rows = ambient.rows(),
        cols = ambient.cols(),
        energy,
        "evaluated wake field"
    );
    Ok(FieldEvaluation {
        deficit,
        effective,
        energy,
    })
}
