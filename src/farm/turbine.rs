use serde::Serialize;

use crate::error::{WakeResult, ensure_finite, ensure_positive, ensure_thrust_coefficient};

/// A single wind turbine in the point (meters) coordinate system.
///
/// Wind flows along increasing `x`. All parameters are validated at
/// construction and the record is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turbine {
    /// Position along the flow axis (m).
    x: f64,

    /// Lateral position (m).
    y: f64,

    /// Rotor diameter (m).
    rotor_diameter: f64,

    /// Thrust coefficient, in `[0, 1)`.
    thrust_coefficient: f64,

    /// Rated (maximum) electrical output (kW).
    rated_power_kw: f64,
}

impl Turbine {
    /// Creates a new turbine.
    ///
    /// # Arguments
    ///
    /// * `x` - Position along the flow axis (m)
    /// * `y` - Lateral position (m)
    /// * `rotor_diameter` - Rotor diameter in meters (must be > 0)
    /// * `thrust_coefficient` - Thrust coefficient (0.0 to < 1.0)
    /// * `rated_power_kw` - Rated output in kW (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for non-finite coordinates, a non-positive
    /// diameter or rated power, or a thrust coefficient outside `[0, 1)`.
    pub fn new(
        x: f64,
        y: f64,
        rotor_diameter: f64,
        thrust_coefficient: f64,
        rated_power_kw: f64,
    ) -> WakeResult<Self> {
        Ok(Self {
            x: ensure_finite("x", x)?,
            y: ensure_finite("y", y)?,
            rotor_diameter: ensure_positive("rotor_diameter", rotor_diameter)?,
            thrust_coefficient: ensure_thrust_coefficient(thrust_coefficient)?,
            rated_power_kw: ensure_positive("rated_power_kw", rated_power_kw)?,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Position as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn rotor_diameter(&self) -> f64 {
        self.rotor_diameter
    }

    /// Rotor radius, `D / 2`.
    pub fn rotor_radius(&self) -> f64 {
        self.rotor_diameter / 2.0
    }

    pub fn thrust_coefficient(&self) -> f64 {
        self.thrust_coefficient
    }

    pub fn rated_power_kw(&self) -> f64 {
        self.rated_power_kw
    }
}
