//! Point-model wind farm: turbines in meters under a uniform free stream.

/// Upstream discovery, deficit combination, and power aggregation.
pub mod aggregator;
pub mod report;
/// Validated turbine record.
pub mod turbine;

pub use aggregator::{WakeContribution, WindFarm};
pub use report::{FarmReport, TurbineResult};
pub use turbine::Turbine;
