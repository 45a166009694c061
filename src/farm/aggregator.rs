//! Point-model farm aggregation: upstream discovery, root-sum-square deficit
//! combination, and capped cubic power.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::report::{FarmReport, TurbineResult};
use super::turbine::Turbine;
use crate::error::{WakeError, WakeResult, ensure_positive};
use crate::wake::{is_in_wake, velocity_deficit_fraction};

/// Wind speed at which every turbine reaches rated power (m/s).
pub const REFERENCE_SPEED: f64 = 12.0;

/// Sea-level standard air density (kg/m³).
pub const DEFAULT_AIR_DENSITY: f64 = 1.225;

/// Capped cubic power law.
///
/// `P = P_rated · (U / U_ref)³`, clamped to `[0, P_rated]`. Returns exactly
/// `0.0` for `U <= 0`.
///
/// # Examples
///
/// ```
/// use wake_farm::farm::aggregator::capped_cubic_power_kw;
///
/// assert_eq!(capped_cubic_power_kw(6.0, 2000.0), 250.0);
/// assert_eq!(capped_cubic_power_kw(15.0, 2000.0), 2000.0);
/// assert_eq!(capped_cubic_power_kw(0.0, 2000.0), 0.0);
/// ```
pub fn capped_cubic_power_kw(effective_speed: f64, rated_power_kw: f64) -> f64 {
    if effective_speed <= 0.0 {
        return 0.0;
    }
    let ratio = effective_speed / REFERENCE_SPEED;
    (rated_power_kw * ratio * ratio * ratio).min(rated_power_kw)
}

/// Root-sum-square combination of absolute speed deficits.
pub fn root_sum_square(deficits: &[f64]) -> f64 {
    deficits.iter().map(|d| d * d).sum::<f64>().sqrt()
}

/// One upstream turbine whose wake reaches a target turbine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WakeContribution {
    /// Index of the waking (source) turbine.
    pub source: usize,
    /// Downstream separation along the flow axis (m).
    pub downstream_distance: f64,
    /// Absolute speed deficit imposed on the target (m/s).
    pub deficit_ms: f64,
}

/// A wind farm in uniform free-stream flow.
///
/// Immutable after construction. Every query is a pure function of the
/// turbine set and flow parameters, so the same farm can be evaluated any
/// number of times, from any number of threads.
#[derive(Debug, Clone, Serialize)]
pub struct WindFarm {
    turbines: Vec<Turbine>,
    /// Free-stream wind speed (m/s).
    free_stream_speed: f64,
    /// Wake expansion coefficient (-).
    wake_expansion: f64,
    /// Air density (kg/m³). Carried for configuration; the power law does not use it.
    air_density: f64,
}

impl WindFarm {
    /// Creates a new wind farm.
    ///
    /// # Arguments
    ///
    /// * `turbines` - Turbine set (order does not affect results)
    /// * `free_stream_speed` - Free-stream wind speed in m/s (must be > 0)
    /// * `wake_expansion` - Wake expansion coefficient `k` (must be > 0)
    /// * `air_density` - Air density in kg/m³ (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for invalid flow parameters and
    /// `DegenerateLayout` if two turbines share identical coordinates.
    pub fn new(
        turbines: Vec<Turbine>,
        free_stream_speed: f64,
        wake_expansion: f64,
        air_density: f64,
    ) -> WakeResult<Self> {
        let free_stream_speed = ensure_positive("free_stream_speed", free_stream_speed)?;
        let wake_expansion = ensure_positive("wake_expansion", wake_expansion)?;
        let air_density = ensure_positive("air_density", air_density)?;

        for (i, a) in turbines.iter().enumerate() {
            if let Some(offset) = turbines[i + 1..]
                .iter()
                .position(|b| a.position() == b.position())
            {
                return Err(WakeError::DegenerateLayout {
                    first: i,
                    second: i + 1 + offset,
                    x: a.x(),
                    y: a.y(),
                });
            }
        }

        Ok(Self {
            turbines,
            free_stream_speed,
            wake_expansion,
            air_density,
        })
    }

    pub fn turbines(&self) -> &[Turbine] {
        &self.turbines
    }

    pub fn len(&self) -> usize {
        self.turbines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turbines.is_empty()
    }

    pub fn free_stream_speed(&self) -> f64 {
        self.free_stream_speed
    }

    pub fn wake_expansion(&self) -> f64 {
        self.wake_expansion
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    fn turbine(&self, idx: usize) -> WakeResult<&Turbine> {
        self.turbines.get(idx).ok_or_else(|| {
            WakeError::invalid(
                "turbine_index",
                format!("{idx} out of range for farm of {}", self.turbines.len()),
            )
        })
    }

    /// Indices of turbines strictly upstream (smaller x) of turbine `idx`.
    ///
    /// Turbines at equal x are never upstream of each other.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `idx` is out of range.
    pub fn upstream_turbines(&self, idx: usize) -> WakeResult<Vec<usize>> {
        let target_x = self.turbine(idx)?.x();
        Ok(self
            .turbines
            .iter()
            .enumerate()
            .filter(|(_, t)| t.x() < target_x)
            .map(|(j, _)| j)
            .collect())
    }

    /// Upstream turbines whose wake cone contains turbine `idx`, with the
    /// absolute deficit each one imposes.
    ///
    /// Deficits are scaled by the global free-stream speed for every source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `idx` is out of range.
    pub fn wake_contributors(&self, idx: usize) -> WakeResult<Vec<WakeContribution>> {
        let target = self.turbine(idx)?;
        let k = self.wake_expansion;
        let mut contributions = Vec::new();

        for j in self.upstream_turbines(idx)? {
            let source = &self.turbines[j];
            if !is_in_wake(
                target.x(),
                target.y(),
                source.x(),
                source.y(),
                source.rotor_radius(),
                k,
            ) {
                continue;
            }
            let dx = target.x() - source.x();
            let fraction =
                velocity_deficit_fraction(dx, source.thrust_coefficient(), source.rotor_radius(), k)?;
            contributions.push(WakeContribution {
                source: j,
                downstream_distance: dx,
                deficit_ms: fraction * self.free_stream_speed,
            });
        }

        Ok(contributions)
    }

    /// Effective wind speed at turbine `idx` (m/s).
    ///
    /// Equals the free-stream speed exactly when no wake reaches the turbine.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `idx` is out of range.
    pub fn effective_wind_speed_at(&self, idx: usize) -> WakeResult<f64> {
        let contributions = self.wake_contributors(idx)?;
        Ok(self.effective_speed_from(&contributions))
    }

    fn effective_speed_from(&self, contributions: &[WakeContribution]) -> f64 {
        if contributions.is_empty() {
            return self.free_stream_speed;
        }
        let deficits: Vec<f64> = contributions.iter().map(|c| c.deficit_ms).collect();
        (self.free_stream_speed - root_sum_square(&deficits)).max(0.0)
    }

    /// Delivered power of turbine `idx` (kW).
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `idx` is out of range.
    pub fn power_at(&self, idx: usize) -> WakeResult<f64> {
        let speed = self.effective_wind_speed_at(idx)?;
        Ok(capped_cubic_power_kw(speed, self.turbine(idx)?.rated_power_kw()))
    }

    /// Total farm power (kW).
    ///
    /// # Errors
    ///
    /// Propagates per-turbine evaluation errors.
    pub fn farm_power(&self) -> WakeResult<f64> {
        Ok(self.evaluate()?.total_power_kw)
    }

    fn turbine_result(&self, idx: usize) -> WakeResult<TurbineResult> {
        let turbine = self.turbine(idx)?;
        let contributions = self.wake_contributors(idx)?;
        let effective_speed_ms = self.effective_speed_from(&contributions);
        let power_kw = capped_cubic_power_kw(effective_speed_ms, turbine.rated_power_kw());
        Ok(TurbineResult {
            index: idx,
            x: turbine.x(),
            y: turbine.y(),
            effective_speed_ms,
            deficit_ms: self.free_stream_speed - effective_speed_ms,
            waking_turbines: contributions.len(),
            power_kw,
            rated_power_kw: turbine.rated_power_kw(),
        })
    }

    /// Evaluates every turbine and returns a read-only report.
    ///
    /// Turbines are evaluated in parallel; the report lists them in farm
    /// order and sums power in that order so repeated runs agree bit for bit.
    ///
    /// # Errors
    ///
    /// Propagates per-turbine evaluation errors.
    pub fn evaluate(&self) -> WakeResult<FarmReport> {
        let results = (0..self.turbines.len())
            .into_par_iter()
            .map(|i| self.turbine_result(i))
            .collect::<WakeResult<Vec<_>>>()?;

        let free_stream_power_kw: f64 = self
            .turbines
            .iter()
            .map(|t| capped_cubic_power_kw(self.free_stream_speed, t.rated_power_kw()))
            .sum();

        let report = FarmReport::from_results(results, self.free_stream_speed, free_stream_power_kw);
        debug!(
            turbines = self.turbines.len(),
            total_power_kw = report.total_power_kw,
            wake_loss_pct = report.wake_loss_pct,
            "evaluated wind farm"
        );
        Ok(report)
    }
}
