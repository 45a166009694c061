//! Jensen (Park) point-wake velocity deficit.

use crate::error::{WakeResult, ensure_finite, ensure_positive, ensure_thrust_coefficient};

/// Fractional velocity deficit behind a rotor.
///
/// `ΔU / U = (1 − sqrt(1 − C_T)) / (1 + k·x / r0)²`
///
/// Returns `0.0` at or upstream of the source (`x <= 0`). The caller scales the
/// fraction by a reference speed: the point model uses the global free-stream
/// speed, the grid model the ambient speed at the source cell.
///
/// # Errors
///
/// Returns `InvalidParameter` when `thrust_coefficient` is outside `[0, 1)`,
/// `rotor_radius` or `k` is not strictly positive, or any input is non-finite.
///
/// # Examples
///
/// ```
/// use wake_farm::wake::deficit::velocity_deficit_fraction;
///
/// let f = velocity_deficit_fraction(300.0, 0.8, 40.0, 0.04).unwrap();
/// assert!((f - 0.3271).abs() < 1e-4);
/// ```
pub fn velocity_deficit_fraction(
    downstream_distance: f64,
    thrust_coefficient: f64,
    rotor_radius: f64,
    k: f64,
) -> WakeResult<f64> {
    let x = ensure_finite("downstream_distance", downstream_distance)?;
    let ct = ensure_thrust_coefficient(thrust_coefficient)?;
    let r0 = ensure_positive("rotor_radius", rotor_radius)?;
    let k = ensure_positive("k", k)?;

    if x <= 0.0 {
        return Ok(0.0);
    }
    let expansion = 1.0 + k * x / r0;
    Ok((1.0 - (1.0 - ct).sqrt()) / (expansion * expansion))
}
