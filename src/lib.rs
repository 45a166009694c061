//! Jensen (Park) wake model and power aggregation for wind farms.
//!
//! Two engines share the same wake physics:
//! - [`farm`] evaluates turbines at continuous coordinates (point model)
//! - [`field`] stamps wakes onto a discrete wind-speed grid (grid model)

/// REST API for a completed evaluation.
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod farm;
pub mod field;
pub mod io;
pub mod layout;
pub mod power_curve;
/// Jensen wake geometry and velocity deficit.
pub mod wake;

pub use error::{WakeError, WakeResult};
