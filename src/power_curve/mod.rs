//! Tabulated turbine power curve for single-turbine statistical studies.

/// Weibull wind-speed sampling and power statistics.
pub mod study;

use serde::Serialize;

use crate::error::{WakeError, WakeResult};

/// Speed→power lookup table with linear interpolation.
///
/// Breakpoints are strictly increasing. Queries outside the tabulated range
/// return the first or last power value (flat extrapolation); that is policy,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCurve {
    speeds_ms: Vec<f64>,
    power_kw: Vec<f64>,
}

impl PowerCurve {
    /// Creates a curve from parallel breakpoint sequences.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for empty or mismatched sequences,
    /// non-finite values, or breakpoints that are not strictly increasing.
    pub fn new(speeds_ms: Vec<f64>, power_kw: Vec<f64>) -> WakeResult<Self> {
        if speeds_ms.is_empty() {
            return Err(WakeError::invalid("power_curve", "must have at least one breakpoint"));
        }
        if speeds_ms.len() != power_kw.len() {
            return Err(WakeError::invalid(
                "power_curve",
                format!(
                    "{} speeds but {} power values",
                    speeds_ms.len(),
                    power_kw.len()
                ),
            ));
        }
        if speeds_ms.iter().chain(&power_kw).any(|v| !v.is_finite()) {
            return Err(WakeError::invalid("power_curve", "values must be finite"));
        }
        if let Some(i) = speeds_ms.windows(2).position(|w| w[1] <= w[0]) {
            return Err(WakeError::invalid(
                "power_curve",
                format!(
                    "speeds must be strictly increasing, but {} follows {} at index {}",
                    speeds_ms[i + 1],
                    speeds_ms[i],
                    i + 1
                ),
            ));
        }
        Ok(Self {
            speeds_ms,
            power_kw,
        })
    }

    /// Reference turbine: cut-in 3 m/s, rated 2000 kW from 15 m/s, cut-out 25 m/s.
    pub fn reference() -> Self {
        Self {
            speeds_ms: vec![0.0, 3.0, 5.0, 8.0, 12.0, 15.0, 20.0, 25.0],
            power_kw: vec![0.0, 0.0, 200.0, 800.0, 1500.0, 2000.0, 2000.0, 0.0],
        }
    }

    pub fn speeds_ms(&self) -> &[f64] {
        &self.speeds_ms
    }

    pub fn power_values_kw(&self) -> &[f64] {
        &self.power_kw
    }

    /// Largest tabulated power (kW).
    pub fn max_power_kw(&self) -> f64 {
        self.power_kw.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Interpolated power at `speed` (kW).
    ///
    /// # Examples
    ///
    /// ```
    /// use wake_farm::power_curve::PowerCurve;
    ///
    /// let curve = PowerCurve::reference();
    /// assert_eq!(curve.power_at(10.0), 1150.0);
    /// assert_eq!(curve.power_at(-2.0), 0.0);
    /// assert_eq!(curve.power_at(40.0), 0.0);
    /// ```
    pub fn power_at(&self, speed: f64) -> f64 {
        let n = self.speeds_ms.len();
        if speed <= self.speeds_ms[0] {
            return self.power_kw[0];
        }
        if speed >= self.speeds_ms[n - 1] {
            return self.power_kw[n - 1];
        }
        // first breakpoint strictly above `speed`; 1 <= hi <= n - 1 here
        let hi = self.speeds_ms.partition_point(|&s| s <= speed);
        let (s0, s1) = (self.speeds_ms[hi - 1], self.speeds_ms[hi]);
        let (p0, p1) = (self.power_kw[hi - 1], self.power_kw[hi]);
        p0 + (p1 - p0) * (speed - s0) / (s1 - s0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_breakpoints_return_table_values() {
        let c = PowerCurve::reference();
        for (s, p) in c.speeds_ms().iter().zip(c.power_values_kw()) {
            assert_eq!(c.power_at(*s), *p);
        }
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let c = PowerCurve::reference();
        assert_eq!(c.power_at(4.0), 100.0);
        assert_eq!(c.power_at(13.5), 1750.0);
        assert_eq!(c.power_at(22.5), 1000.0);
    }

    #[test]
    fn flat_extrapolation_outside_range() {
        let c = PowerCurve::new(vec![3.0, 12.0], vec![0.0, 1500.0]).unwrap();
        assert_eq!(c.power_at(1.0), 0.0);
        assert_eq!(c.power_at(30.0), 1500.0);
    }

    #[test]
    fn single_point_curve_is_constant() {
        let c = PowerCurve::new(vec![10.0], vec![500.0]).unwrap();
        assert_eq!(c.power_at(0.0), 500.0);
        assert_eq!(c.power_at(20.0), 500.0);
    }

    #[test]
    fn rejects_malformed_curves() {
        assert!(PowerCurve::new(vec![], vec![]).is_err());
        assert!(PowerCurve::new(vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(PowerCurve::new(vec![0.0, 5.0, 5.0], vec![0.0, 1.0, 2.0]).is_err());
        assert!(PowerCurve::new(vec![0.0, 5.0, 3.0], vec![0.0, 1.0, 2.0]).is_err());
        assert!(PowerCurve::new(vec![0.0, f64::NAN], vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn max_power() {
        assert_eq!(PowerCurve::reference().max_power_kw(), 2000.0);
    }
}
