//! Top-hat wake cone geometry.

/// Wake radius at a downstream distance: `r(x) = r0 + k·x`.
///
/// A plain evaluation of the linear law with no domain check; only
/// `downstream_distance > 0` is physically meaningful. [`is_in_wake`] and the
/// grid engine call it only behind the source rotor.
///
/// # Arguments
///
/// * `downstream_distance` - Distance behind the source rotor (m, or cells in
///   the grid model)
/// * `rotor_radius` - Source rotor radius
/// * `k` - Wake expansion coefficient
pub fn wake_radius(downstream_distance: f64, rotor_radius: f64, k: f64) -> f64 {
    rotor_radius + k * downstream_distance
}

/// Checks whether a target point lies inside the wake cone of a source rotor.
///
/// Wind blows along increasing x. Anything at or upstream of the source
/// (`dx <= 0`) is never in its wake, so a turbine never wakes itself.
/// Containment depends on the lateral offset only.
///
/// # Examples
///
/// ```
/// use wake_farm::wake::geometry::is_in_wake;
///
/// assert!(is_in_wake(300.0, 0.0, 0.0, 0.0, 40.0, 0.04));
/// assert!(!is_in_wake(300.0, 60.0, 0.0, 0.0, 40.0, 0.04));
/// assert!(!is_in_wake(0.0, 0.0, 300.0, 0.0, 40.0, 0.04));
/// ```
pub fn is_in_wake(
    target_x: f64,
    target_y: f64,
    source_x: f64,
    source_y: f64,
    source_rotor_radius: f64,
    k: f64,
) -> bool {
    let dx = target_x - source_x;
    if dx <= 0.0 {
        return false;
    }
    let dy = target_y - source_y;
    dy.abs() <= wake_radius(dx, source_rotor_radius, k)
}
