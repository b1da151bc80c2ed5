//! Curve geometry shared by the calibration model and the hit tester
//!
//! Raw coordinates come straight from the document renderer:
//! - Units are document units (points), not pixels
//! - The frame is unrotated page space
//!
//! Axis-space and display-space points reuse the same `PageCoordinate` type;
//! which frame a value lives in is decided by the function that produced it.

use crate::rotation::Rotation;

/// Stable curve identity assigned by the curve provider for the current page/rotation
pub type CurveId = u32;

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PageCoordinate {
    /// Create a new coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another coordinate
    pub fn distance_to(&self, other: &PageCoordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from this point to the segment `start..end`
    ///
    /// The projection parameter is clamped to [0, 1] so the nearest point may be
    /// an endpoint. A zero-length segment degrades to point distance.
    pub fn distance_to_segment(&self, start: &PageCoordinate, end: &PageCoordinate) -> f64 {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length_sq = dx * dx + dy * dy;

        if length_sq == 0.0 {
            return self.distance_to(start);
        }

        let t = (((self.x - start.x) * dx + (self.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
        let projection = PageCoordinate::new(start.x + t * dx, start.y + t * dy);
        self.distance_to(&projection)
    }
}

/// An identity-bearing polyline in raw document coordinates
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub id: CurveId,
    pub points: Vec<PageCoordinate>,
}

impl Curve {
    /// Create a new curve
    pub fn new(id: CurveId, points: Vec<PageCoordinate>) -> Self {
        Self { id, points }
    }

    /// Whether the curve has enough points to form at least one segment
    pub fn is_measurable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Minimum distance from `point` to any segment of the curve
    ///
    /// Returns `None` for curves with fewer than two points.
    pub fn distance_to(&self, point: &PageCoordinate) -> Option<f64> {
        if !self.is_measurable() {
            return None;
        }

        self.points
            .windows(2)
            .map(|w| point.distance_to_segment(&w[0], &w[1]))
            .reduce(f64::min)
    }
}

/// Bounding box of a set of points in axis space
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl AxisExtent {
    /// Elementwise min/max of `points` after mapping them through `rotation`
    ///
    /// Returns `None` for an empty slice.
    pub fn from_raw_points(points: &[PageCoordinate], rotation: Rotation) -> Option<Self> {
        let mut iter = points.iter().map(|p| rotation.normalize(*p));
        let first = iter.next()?;

        let extent = iter.fold(
            Self { min_x: first.x, max_x: first.x, min_y: first.y, max_y: first.y },
            |acc, p| Self {
                min_x: acc.min_x.min(p.x),
                max_x: acc.max_x.max(p.x),
                min_y: acc.min_y.min(p.y),
                max_y: acc.max_y.max(p.y),
            },
        );

        Some(extent)
    }

    /// Width along the horizontal axis-space dimension
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height along the vertical axis-space dimension
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
