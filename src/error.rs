//! Error types shared by the wake engine, field engine, and power curve.

use thiserror::Error;

/// Errors raised while validating inputs or evaluating a farm.
///
/// Every failure is deterministic: the same malformed input fails the same
/// way on every call.
#[derive(Error, Debug)]
pub enum WakeError {
    /// A physical or structural parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name (e.g., `"thrust_coefficient"`).
        name: String,
        /// Human-readable constraint description.
        message: String,
    },

    /// Two turbines share identical coordinates.
    #[error("degenerate layout: turbines {first} and {second} both sit at ({x}, {y})")]
    DegenerateLayout {
        first: usize,
        second: usize,
        x: f64,
        y: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias used throughout the crate.
pub type WakeResult<T> = Result<T, WakeError>;

impl WakeError {
    /// Shorthand for building an [`WakeError::InvalidParameter`].
    pub fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Rejects NaN and infinities for a named parameter.
pub(crate) fn ensure_finite(name: &str, value: f64) -> WakeResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WakeError::invalid(name, format!("must be finite, got {value}")))
    }
}

/// Requires a finite, strictly positive value.
pub(crate) fn ensure_positive(name: &str, value: f64) -> WakeResult<f64> {
    let value = ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(WakeError::invalid(name, format!("must be > 0, got {value}")))
    }
}

/// Requires a thrust coefficient in `[0, 1)`.
pub(crate) fn ensure_thrust_coefficient(value: f64) -> WakeResult<f64> {
    let value = ensure_finite("thrust_coefficient", value)?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(WakeError::invalid(
            "thrust_coefficient",
            format!("must be in [0, 1), got {value}"),
        ))
    }
}
