//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::farm::FarmReport;
use crate::layout::LayoutReport;
use crate::power_curve::study::PowerStudy;

/// Combined state response.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub farm: FarmSummary,
    pub layout: LayoutReport,
    pub study: PowerStudy,
}

/// Farm-level totals without the per-turbine list (see `/turbines`).
#[derive(Debug, Serialize)]
pub struct FarmSummary {
    pub turbine_count: usize,
    pub free_stream_speed_ms: f64,
    pub total_power_kw: f64,
    pub free_stream_power_kw: f64,
    pub wake_loss_pct: f64,
    pub rated_capacity_kw: f64,
    pub waked_turbine_count: usize,
}

impl From<&FarmReport> for FarmSummary {
    fn from(r: &FarmReport) -> Self {
        Self {
            turbine_count: r.turbines.len(),
            free_stream_speed_ms: r.free_stream_speed_ms,
            total_power_kw: r.total_power_kw,
            free_stream_power_kw: r.free_stream_power_kw,
            wake_loss_pct: r.wake_loss_pct,
            rated_capacity_kw: r.rated_capacity_kw,
            waked_turbine_count: r.waked_turbine_count,
        }
    }
}

/// Query parameters for `/turbines`; both bounds are inclusive turbine indices.
#[derive(Debug, Deserialize)]
pub struct TurbineQuery {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// Error body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
