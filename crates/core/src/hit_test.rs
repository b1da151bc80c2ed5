//! Nearest-curve hit testing for pointer selection
//!
//! Distances are measured in whatever frame the caller supplies the pointer
//! and curves in. The session projects curves into display space first, so
//! the threshold behaves as a screen-space tolerance and the tolerance in
//! document units shrinks as the user zooms in.

use crate::geometry::{Curve, CurveId, PageCoordinate};
use crate::rotation::Rotation;

/// A successful hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Id of the nearest curve
    pub curve_id: CurveId,

    /// Position of that curve in the candidate slice
    pub index: usize,

    /// Minimum segment distance from the pointer
    pub distance: f64,
}

/// Configuration for hit testing
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Enable/disable hit testing
    pub enabled: bool,

    /// Pick radius, in the same units as the pointer position
    pub threshold: f64,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 8.0, // display pixels
        }
    }
}

/// Finds the curve under the pointer
#[derive(Debug, Default)]
pub struct CurveHitTester {
    config: HitTestConfig,
}

impl CurveHitTester {
    /// Create a hit tester with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hit tester with custom configuration
    pub fn with_config(config: HitTestConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &HitTestConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: HitTestConfig) {
        self.config = config;
    }

    /// Nearest curve id within the configured threshold
    pub fn hit(&self, point: &PageCoordinate, curves: &[Curve]) -> Option<CurveHit> {
        if !self.config.enabled {
            return None;
        }

        nearest_hit(point, curves, self.config.threshold)
    }
}

/// Id of the curve nearest to `point`, if strictly closer than `threshold`
pub fn nearest(point: &PageCoordinate, curves: &[Curve], threshold: f64) -> Option<CurveId> {
    nearest_hit(point, curves, threshold).map(|hit| hit.curve_id)
}

/// Like [`nearest`] but also reports position and distance
///
/// A curve only displaces the current best when strictly closer, so on a tie
/// the earlier curve wins. Curves with fewer than two points are skipped.
pub fn nearest_hit(point: &PageCoordinate, curves: &[Curve], threshold: f64) -> Option<CurveHit> {
    let mut best: Option<CurveHit> = None;
    let mut best_distance = threshold;

    for (index, curve) in curves.iter().enumerate() {
        let Some(distance) = curve.distance_to(point) else {
            continue;
        };

        if distance < best_distance {
            best_distance = distance;
            best = Some(CurveHit { curve_id: curve.id, index, distance });
        }
    }

    best
}

/// Raw document to display coordinate transform supplied by the renderer
///
/// Applies the rotation normalizer, flips Y (document Y grows upward,
/// display Y grows downward), scales by zoom and then translates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplayTransform {
    /// Display units per document unit
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub rotation: Rotation,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self { zoom: 1.0, offset_x: 0.0, offset_y: 0.0, rotation: Rotation::R0 }
    }
}

impl DisplayTransform {
    /// Identity projection except for zoom
    pub fn with_zoom(zoom: f64) -> Self {
        Self { zoom, ..Self::default() }
    }

    /// Project a raw coordinate into display space
    pub fn to_display(&self, raw: PageCoordinate) -> PageCoordinate {
        let axis = self.rotation.normalize(raw);
        PageCoordinate::new(axis.x * self.zoom + self.offset_x, -axis.y * self.zoom + self.offset_y)
    }

    /// Project every point of a curve, keeping its id
    pub fn project_curve(&self, curve: &Curve) -> Curve {
        Curve::new(curve.id, curve.points.iter().map(|p| self.to_display(*p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: CurveId, y: f64) -> Curve {
        Curve::new(id, vec![PageCoordinate::new(0.0, y), PageCoordinate::new(100.0, y)])
    }

    #[test]
    fn test_nearest_picks_smallest_distance() {
        let curves = vec![line(10, 0.0), line(11, 5.0), line(12, 20.0)];
        let pointer = PageCoordinate::new(50.0, 6.0);

        assert_eq!(nearest(&pointer, &curves, 10.0), Some(11));
    }

    #[test]
    fn test_nearest_respects_threshold() {
        let curves = vec![line(0, 0.0), line(1, 30.0)];
        let pointer = PageCoordinate::new(50.0, 15.0);

        // Both curves are 15 away; neither is inside the threshold
        assert_eq!(nearest(&pointer, &curves, 10.0), None);
        // A distance equal to the threshold is still a miss
        assert_eq!(nearest(&pointer, &curves, 15.0), None);
    }

    #[test]
    fn test_tie_keeps_first_curve() {
        let curves = vec![line(7, 0.0), line(3, 10.0)];
        let pointer = PageCoordinate::new(50.0, 5.0);

        let hit = nearest_hit(&pointer, &curves, 10.0).unwrap();
        assert_eq!(hit.curve_id, 7);
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_curves_are_skipped() {
        let curves = vec![
            Curve::new(0, vec![PageCoordinate::new(50.0, 0.0)]),
            Curve::new(1, vec![]),
            line(2, 3.0),
        ];
        let pointer = PageCoordinate::new(50.0, 0.0);

        assert_eq!(nearest(&pointer, &curves, 10.0), Some(2));
    }

    #[test]
    fn test_endpoint_distance_is_used_past_segment_end() {
        let curves = vec![line(0, 0.0)];
        let pointer = PageCoordinate::new(104.0, 3.0);

        let hit = nearest_hit(&pointer, &curves, 10.0).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_tester_uses_config() {
        let curves = vec![line(0, 0.0)];
        let pointer = PageCoordinate::new(50.0, 6.0);

        let tester = CurveHitTester::new();
        assert_eq!(tester.hit(&pointer, &curves).map(|h| h.curve_id), Some(0));

        let mut tester =
            CurveHitTester::with_config(HitTestConfig { threshold: 5.0, ..Default::default() });
        assert!(tester.hit(&pointer, &curves).is_none());

        tester.set_config(HitTestConfig { enabled: false, threshold: 100.0 });
        assert!(tester.hit(&pointer, &curves).is_none());
        assert!(!tester.config().enabled);
    }

    #[test]
    fn test_display_transform_flips_and_zooms() {
        let transform =
            DisplayTransform { zoom: 2.0, offset_x: 10.0, offset_y: 500.0, rotation: Rotation::R0 };
        let p = transform.to_display(PageCoordinate::new(5.0, 20.0));
        assert_eq!(p, PageCoordinate::new(20.0, 460.0));
    }

    #[test]
    fn test_threshold_is_screen_space() {
        // Curve is 4 document units below the pointer
        let curves = vec![line(0, 0.0)];
        let raw_pointer = PageCoordinate::new(50.0, 4.0);

        for (zoom, expected) in [(1.0, Some(0)), (3.0, None)] {
            let transform = DisplayTransform::with_zoom(zoom);
            let projected: Vec<Curve> = curves.iter().map(|c| transform.project_curve(c)).collect();
            let pointer = transform.to_display(raw_pointer);
            assert_eq!(nearest(&pointer, &projected, 8.0), expected, "zoom {zoom}");
        }
    }
}
