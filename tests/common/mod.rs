//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use wake_farm::farm::{Turbine, WindFarm};
use wake_farm::farm::aggregator::DEFAULT_AIR_DENSITY;
use wake_farm::field::{Grid, WakeFieldParams};

/// Reference turbine at `(x, y)`: D = 80 m, C_T = 0.8, 2000 kW rated.
pub fn turbine(x: f64, y: f64) -> Turbine {
    Turbine::new(x, y, 80.0, 0.8, 2000.0).unwrap()
}

/// Farm at U_inf = 10 m/s with k = 0.04.
pub fn farm(turbines: Vec<Turbine>) -> WindFarm {
    WindFarm::new(turbines, 10.0, 0.04, DEFAULT_AIR_DENSITY).unwrap()
}

/// Two reference turbines 300 m apart on the flow axis.
pub fn aligned_pair() -> WindFarm {
    farm(vec![turbine(0.0, 0.0), turbine(300.0, 0.0)])
}

/// Effective speed behind one reference turbine at `dx` meters, U_inf = 10.
pub fn single_wake_speed(dx: f64) -> f64 {
    10.0 - 10.0 * (1.0 - 0.2_f64.sqrt()) / (1.0 + 0.04 * dx / 40.0).powi(2)
}

/// Uniform `rows × cols` ambient field.
pub fn uniform_field(rows: usize, cols: usize, speed: f64) -> Grid {
    Grid::filled(rows, cols, speed)
}

/// Small-rotor grid parameters: D = 4 cells, C_T = 0.8, k = 0.04.
pub fn small_params() -> WakeFieldParams {
    WakeFieldParams::new(4.0, 0.8, 0.04).unwrap()
}
