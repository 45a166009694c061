//! Jensen wake physics shared by the point and grid models.

/// Jensen velocity-deficit law.
pub mod deficit;
/// Wake cone radius and containment test.
pub mod geometry;

pub use deficit::velocity_deficit_fraction;
pub use geometry::{is_in_wake, wake_radius};
