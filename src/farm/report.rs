//! Read-only snapshots of a point-model farm evaluation.

use std::fmt;

use serde::Serialize;

/// Evaluation record for one turbine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbineResult {
    /// Position of the turbine in the farm's turbine list.
    pub index: usize,
    /// Position along the flow axis (m).
    pub x: f64,
    /// Lateral position (m).
    pub y: f64,
    /// Effective wind speed after wake losses (m/s).
    pub effective_speed_ms: f64,
    /// Combined speed deficit: free stream minus effective speed (m/s).
    pub deficit_ms: f64,
    /// Number of upstream turbines whose wake reaches this one.
    pub waking_turbines: usize,
    /// Delivered power (kW).
    pub power_kw: f64,
    /// Rated power (kW).
    pub rated_power_kw: f64,
}

impl fmt::Display for TurbineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T{:<3} ({:>7.1}, {:>7.1}) m | U_eff={:>6.3} m/s  deficit={:>6.3} m/s  \
             wakes={} | P={:>8.1} kW ({:.1}% of rated)",
            self.index + 1,
            self.x,
            self.y,
            self.effective_speed_ms,
            self.deficit_ms,
            self.waking_turbines,
            self.power_kw,
            100.0 * self.power_kw / self.rated_power_kw,
        )
    }
}

/// Aggregate farm output derived from per-turbine results.
///
/// Computed post-hoc from the `TurbineResult` list so that the totals always
/// agree with the per-turbine records.
#[derive(Debug, Clone, Serialize)]
pub struct FarmReport {
    /// Free-stream wind speed used for the evaluation (m/s).
    pub free_stream_speed_ms: f64,
    /// Per-turbine records in farm order.
    pub turbines: Vec<TurbineResult>,
    /// Total delivered power (kW).
    pub total_power_kw: f64,
    /// Power the farm would deliver with no wake interaction (kW).
    pub free_stream_power_kw: f64,
    /// Share of free-stream power lost to wakes (%).
    pub wake_loss_pct: f64,
    /// Total rated capacity (kW).
    pub rated_capacity_kw: f64,
    /// Number of turbines touched by at least one wake.
    pub waked_turbine_count: usize,
}

impl FarmReport {
    /// Builds the report from per-turbine results.
    ///
    /// # Arguments
    ///
    /// * `turbines` - Per-turbine results in farm order
    /// * `free_stream_speed_ms` - Free-stream speed of the evaluation
    /// * `free_stream_power_kw` - Farm output with every turbine at free stream
    pub fn from_results(
        turbines: Vec<TurbineResult>,
        free_stream_speed_ms: f64,
        free_stream_power_kw: f64,
    ) -> Self {
        let mut total_power_kw = 0.0;
        let mut rated_capacity_kw = 0.0;
        let mut waked = 0_usize;
        for t in &turbines {
            total_power_kw += t.power_kw;
            rated_capacity_kw += t.rated_power_kw;
            if t.waking_turbines > 0 {
                waked += 1;
            }
        }

        let wake_loss_pct = if free_stream_power_kw > 0.0 {
            100.0 * (free_stream_power_kw - total_power_kw) / free_stream_power_kw
        } else {
            0.0
        };

        Self {
            free_stream_speed_ms,
            turbines,
            total_power_kw,
            free_stream_power_kw,
            wake_loss_pct,
            rated_capacity_kw,
            waked_turbine_count: waked,
        }
    }

    /// Per-turbine powers in farm order (kW).
    pub fn powers_kw(&self) -> Vec<f64> {
        self.turbines.iter().map(|t| t.power_kw).collect()
    }
}

impl fmt::Display for FarmReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Farm Report ---")?;
        writeln!(f, "Turbines:              {}", self.turbines.len())?;
        writeln!(f, "Free-stream speed:     {:.2} m/s", self.free_stream_speed_ms)?;
        writeln!(f, "Total power:           {:.1} kW", self.total_power_kw)?;
        writeln!(f, "Free-stream power:     {:.1} kW", self.free_stream_power_kw)?;
        writeln!(f, "Wake loss:             {:.2}%", self.wake_loss_pct)?;
        writeln!(f, "Rated capacity:        {:.1} kW", self.rated_capacity_kw)?;
        write!(f, "Waked turbines:        {}", self.waked_turbine_count)
    }
}
