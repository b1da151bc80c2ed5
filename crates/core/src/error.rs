//! Error types for the calibration engine
//!
//! Every failure is recoverable: the operation that detects it returns the
//! error and leaves the session in its previous, consistent state.

use crate::calibration::Axis;
use crate::geometry::CurveId;

/// Errors produced by calibration, conversion and selection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// Rotation outside {0, 90, 180, 270} after reduction modulo 360
    #[error("invalid rotation: {0} degrees (expected a multiple of 90)")]
    InvalidRotation(i32),

    /// Reference curve has fewer than two points
    #[error("{axis} axis reference curve needs at least 2 points, got {count}")]
    InsufficientPoints { axis: Axis, count: usize },

    /// Reference curve has no extent along its own dimension
    #[error("{0} axis reference curve has zero extent along its axis")]
    ZeroExtentAxis(Axis),

    /// Logarithmic scale with a non-positive bound
    #[error("{axis} axis is logarithmic but its bounds are not positive (min={min}, max={max})")]
    NonPositiveLogDomain { axis: Axis, min: f64, max: f64 },

    /// Conversion requested before the axis has an extent and both bounds
    #[error("{0} axis is not calibrated")]
    NotCalibrated(Axis),

    /// Selected curve id is not part of the supplied collection
    #[error("unknown curve id {0}")]
    UnknownCurve(CurveId),

    /// Engine configuration could not be read or parsed
    #[error("invalid engine configuration: {0}")]
    Config(String),
}

/// Result alias for engine operations
pub type CalibrationResult<T> = Result<T, CalibrationError>;
