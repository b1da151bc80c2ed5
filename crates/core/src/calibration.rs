//! Axis calibration and the axis-space to data-value conversion
//!
//! Each logical axis is calibrated from a reference curve picked on the page
//! plus two user-entered real-world bounds. The curve's raw points are kept so
//! that a rotation change can re-derive the axis-space extent instead of
//! invalidating the calibration.

use crate::error::{CalibrationError, CalibrationResult};
use crate::geometry::{AxisExtent, Curve, PageCoordinate};
use crate::rotation::Rotation;
use std::fmt;

/// Logical plot axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Which real-world bound is being entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

/// How real-world values vary with axis-space position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    #[serde(alias = "log")]
    Logarithmic,
}

/// Calibration state for one logical axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisCalibration {
    /// Raw points of the reference curve, replayed on rotation change
    reference_points: Option<Vec<PageCoordinate>>,
    /// Extent of the reference curve in the current rotation's axis space
    extent: Option<AxisExtent>,
    real_min: Option<f64>,
    real_max: Option<f64>,
    scale_kind: ScaleKind,
}

impl AxisCalibration {
    /// Extent of the reference curve in axis space
    pub fn extent(&self) -> Option<&AxisExtent> {
        self.extent.as_ref()
    }

    /// Raw points of the reference curve
    pub fn reference_points(&self) -> Option<&[PageCoordinate]> {
        self.reference_points.as_deref()
    }

    pub fn real_min(&self) -> Option<f64> {
        self.real_min
    }

    pub fn real_max(&self) -> Option<f64> {
        self.real_max
    }

    pub fn scale_kind(&self) -> ScaleKind {
        self.scale_kind
    }

    /// Extent present and both bounds set
    pub fn is_complete(&self) -> bool {
        self.extent.is_some() && self.real_min.is_some() && self.real_max.is_some()
    }

    /// Convert one axis-space coordinate along this axis's own dimension
    fn map(&self, axis: Axis, coord: f64) -> CalibrationResult<f64> {
        let (Some(extent), Some(real_min), Some(real_max)) =
            (self.extent, self.real_min, self.real_max)
        else {
            return Err(CalibrationError::NotCalibrated(axis));
        };

        let (pdf_min, span) = match axis {
            Axis::X => (extent.min_x, extent.width()),
            Axis::Y => (extent.min_y, extent.height()),
        };

        if span == 0.0 {
            return Err(CalibrationError::ZeroExtentAxis(axis));
        }

        let t = (coord - pdf_min) / span;

        match self.scale_kind {
            ScaleKind::Linear => Ok(lerp(real_min, real_max, t)),
            ScaleKind::Logarithmic => {
                if real_min <= 0.0 || real_max <= 0.0 {
                    return Err(CalibrationError::NonPositiveLogDomain {
                        axis,
                        min: real_min,
                        max: real_max,
                    });
                }

                // Endpoints are pinned so the calibration bounds round-trip exactly
                if t == 0.0 {
                    return Ok(real_min);
                }
                if t == 1.0 {
                    return Ok(real_max);
                }

                Ok(10f64.powf(lerp(real_min.log10(), real_max.log10(), t)))
            }
        }
    }
}

/// Interpolation that is exact at both t = 0 and t = 1
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Calibration for both axes plus the rotation their extents are expressed in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationSet {
    x: AxisCalibration,
    y: AxisCalibration,
    rotation: Rotation,
}

impl CalibrationSet {
    /// Create an empty calibration set at rotation 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty calibration set at the given rotation
    pub fn with_rotation(rotation: Rotation) -> Self {
        Self { rotation, ..Self::default() }
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Calibration for one axis
    pub fn axis(&self, axis: Axis) -> &AxisCalibration {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisCalibration {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Store `curve` as the reference for `axis` and derive its extent
    ///
    /// A curve with fewer than two points is rejected and the previous
    /// calibration for that axis is left untouched.
    pub fn set_reference_curve(&mut self, axis: Axis, curve: &Curve) -> CalibrationResult<()> {
        if !curve.is_measurable() {
            log::warn!(
                "rejecting curve {} as {axis} reference: {} point(s)",
                curve.id,
                curve.points.len()
            );
            return Err(CalibrationError::InsufficientPoints { axis, count: curve.points.len() });
        }

        let extent = AxisExtent::from_raw_points(&curve.points, self.rotation)
            .ok_or(CalibrationError::InsufficientPoints { axis, count: 0 })?;

        let rotation = self.rotation;
        let calibration = self.axis_mut(axis);
        calibration.reference_points = Some(curve.points.clone());
        calibration.extent = Some(extent);

        log::debug!(
            "{axis} reference set from curve {} at {}°: {extent:?}",
            curve.id,
            rotation.degrees()
        );
        Ok(())
    }

    /// Store a real-world bound; min and max may be in either order
    pub fn set_bound(&mut self, axis: Axis, which: Bound, value: f64) {
        let calibration = self.axis_mut(axis);
        match which {
            Bound::Min => calibration.real_min = Some(value),
            Bound::Max => calibration.real_max = Some(value),
        }
    }

    /// Set the scale kind for an axis
    pub fn set_scale_kind(&mut self, axis: Axis, kind: ScaleKind) {
        self.axis_mut(axis).scale_kind = kind;
    }

    /// Both axes have an extent and both bounds
    pub fn is_calibrated(&self) -> bool {
        self.x.is_complete() && self.y.is_complete()
    }

    /// Change rotation and re-derive both extents before returning
    ///
    /// New extents are computed first and swapped in together, so no caller
    /// can observe one axis in the old frame and the other in the new one.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        let recompute = |calibration: &AxisCalibration| {
            calibration
                .reference_points
                .as_deref()
                .and_then(|points| AxisExtent::from_raw_points(points, rotation))
        };

        let x_extent = recompute(&self.x);
        let y_extent = recompute(&self.y);

        self.x.extent = x_extent;
        self.y.extent = y_extent;
        self.rotation = rotation;

        log::debug!("calibration extents recomputed for {}°", rotation.degrees());
    }

    /// Convert a raw coordinate to data values
    ///
    /// The X axis is evaluated before Y; the first failure is returned.
    pub fn convert(&self, raw: PageCoordinate) -> CalibrationResult<PageCoordinate> {
        let axis_point = self.rotation.normalize(raw);
        let x = self.x.map(Axis::X, axis_point.x)?;
        let y = self.y.map(Axis::Y, axis_point.y)?;
        Ok(PageCoordinate::new(x, y))
    }

    /// Clear both axes at once; rotation is kept
    pub fn reset(&mut self) {
        self.x = AxisCalibration::default();
        self.y = AxisCalibration::default();
    }
}
