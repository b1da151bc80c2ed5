//! Calibration session: the engine instance for one viewed document
//!
//! The session owns the calibration set, the current rotation and the
//! selection state. Nothing is shared between sessions; each gets its own id
//! so log lines from concurrent viewers can be told apart.

use crate::calibration::{Axis, Bound, CalibrationSet, ScaleKind};
use crate::config::EngineConfig;
use crate::error::{CalibrationError, CalibrationResult};
use crate::geometry::{Curve, CurveId, PageCoordinate};
use crate::hit_test::{CurveHitTester, DisplayTransform};
use crate::rotation::Rotation;
use crate::selection::{
    SelectionMode, SelectionObserver, SelectionOutcome, SelectionState, SelectionStateMachine,
};

/// Unique identifier for a calibration session
pub type SessionId = uuid::Uuid;

/// Axis calibration and curve selection for one document-viewing session
pub struct CalibrationSession {
    id: SessionId,
    calibration: CalibrationSet,
    selection: SelectionStateMachine,
    hit_tester: CurveHitTester,
    default_scale_kind: ScaleKind,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl CalibrationSession {
    /// Create a session with default configuration
    pub fn new() -> Self {
        Self::build(&EngineConfig::default(), Rotation::R0)
    }

    /// Create a session from configuration
    pub fn with_config(config: &EngineConfig) -> CalibrationResult<Self> {
        let rotation = Rotation::from_degrees(config.initial_rotation)?;
        Ok(Self::build(config, rotation))
    }

    fn build(config: &EngineConfig, rotation: Rotation) -> Self {
        let mut calibration = CalibrationSet::with_rotation(rotation);
        calibration.set_scale_kind(Axis::X, config.default_scale_kind);
        calibration.set_scale_kind(Axis::Y, config.default_scale_kind);

        let session = Self {
            id: SessionId::new_v4(),
            calibration,
            selection: SelectionStateMachine::new(),
            hit_tester: CurveHitTester::with_config(config.hit_test),
            default_scale_kind: config.default_scale_kind,
            observers: Vec::new(),
        };

        log::debug!("session {} created at {}°", session.id, rotation.degrees());
        session
    }

    /// Get the session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current calibration state
    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    /// Hit tester used by the pointer API
    pub fn hit_tester_mut(&mut self) -> &mut CurveHitTester {
        &mut self.hit_tester
    }

    pub fn rotation(&self) -> Rotation {
        self.calibration.rotation()
    }

    /// Apply a rotation reported by the renderer
    ///
    /// Both axis extents are re-derived before this returns. An invalid
    /// rotation is rejected and the previous rotation stays in effect.
    pub fn set_rotation(&mut self, degrees: i32) -> CalibrationResult<Rotation> {
        let rotation = Rotation::from_degrees(degrees).inspect_err(|_| {
            log::warn!("session {}: ignoring rotation of {degrees}°", self.id);
        })?;

        self.calibration.set_rotation(rotation);
        Ok(rotation)
    }

    /// Register an observer for selection outcomes
    pub fn add_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    pub fn selection_state(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Wait for the next picked curve to define `axis`
    pub fn begin_calibration(&mut self, axis: Axis) {
        self.selection.begin_calibration(axis);
    }

    /// Switch free selection on or off
    pub fn toggle_free_selection(&mut self) -> SelectionMode {
        self.selection.toggle_free_selection()
    }

    /// Abandon the current mode
    pub fn cancel(&mut self) {
        self.selection.cancel();
    }

    pub fn set_bound(&mut self, axis: Axis, which: Bound, value: f64) {
        self.calibration.set_bound(axis, which, value);
    }

    pub fn set_scale_kind(&mut self, axis: Axis, kind: ScaleKind) {
        self.calibration.set_scale_kind(axis, kind);
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    /// Convert a raw document coordinate to data values
    pub fn convert(&self, raw_x: f64, raw_y: f64) -> CalibrationResult<PageCoordinate> {
        self.calibration.convert(PageCoordinate::new(raw_x, raw_y))
    }

    /// Convert every point of a curve, stopping at the first failure
    pub fn convert_curve(&self, curve: &Curve) -> CalibrationResult<Vec<PageCoordinate>> {
        curve.points.iter().map(|p| self.calibration.convert(*p)).collect()
    }

    /// Clear both axes; scale kinds return to the configured default
    pub fn reset(&mut self) {
        self.calibration.reset();
        self.calibration.set_scale_kind(Axis::X, self.default_scale_kind);
        self.calibration.set_scale_kind(Axis::Y, self.default_scale_kind);
        log::debug!("session {}: calibration reset", self.id);
    }

    /// Update hover from a pointer position in display coordinates
    ///
    /// `curves` are in raw coordinates and are projected with `transform`
    /// before measuring, so the pick threshold is in display units. The
    /// session rotation replaces `transform.rotation`.
    pub fn pointer_moved(
        &mut self,
        pointer: PageCoordinate,
        curves: &[Curve],
        transform: &DisplayTransform,
    ) -> Option<CurveId> {
        if self.selection.mode() == SelectionMode::Idle {
            self.selection.hover(None);
            return None;
        }

        let hovered = self.pick(pointer, curves, transform).map(|curve| curve.id);
        self.selection.hover(hovered);
        hovered
    }

    /// Pick the curve under a display-space click and route it
    pub fn pointer_clicked(
        &mut self,
        pointer: PageCoordinate,
        curves: &[Curve],
        transform: &DisplayTransform,
    ) -> SelectionOutcome {
        let picked = self.pick(pointer, curves, transform);
        let outcome = self.selection.click(picked, &mut self.calibration);
        self.notify(&outcome);
        outcome
    }

    /// Route a curve chosen by id, bypassing the hit test
    pub fn select_curve(
        &mut self,
        curve_id: CurveId,
        curves: &[Curve],
    ) -> CalibrationResult<SelectionOutcome> {
        let curve = curves
            .iter()
            .find(|curve| curve.id == curve_id)
            .ok_or(CalibrationError::UnknownCurve(curve_id))?;

        let outcome = self.selection.click(Some(curve), &mut self.calibration);
        self.notify(&outcome);
        Ok(outcome)
    }

    fn pick<'a>(
        &self,
        pointer: PageCoordinate,
        curves: &'a [Curve],
        transform: &DisplayTransform,
    ) -> Option<&'a Curve> {
        // Distances must be measured in the same frame as extents and conversion
        let transform = DisplayTransform { rotation: self.rotation(), ..*transform };
        let projected: Vec<Curve> = curves.iter().map(|c| transform.project_curve(c)).collect();
        let hit = self.hit_tester.hit(&pointer, &projected)?;
        curves.get(hit.index)
    }

    fn notify(&mut self, outcome: &SelectionOutcome) {
        match outcome {
            SelectionOutcome::CalibrationFailed { axis, curve_id, error } => {
                log::warn!(
                    "session {}: curve {curve_id} rejected for {axis} axis: {error}",
                    self.id
                );
            }
            SelectionOutcome::Labeled { curve, values: Some(Err(error)) } => {
                log::warn!(
                    "session {}: curve {} could not be converted: {error}",
                    self.id,
                    curve.id
                );
            }
            _ => {}
        }

        for observer in &mut self.observers {
            observer.on_selection(outcome);
        }
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CalibrationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationSession")
            .field("id", &self.id)
            .field("calibration", &self.calibration)
            .field("selection", &self.selection)
            .field("observers", &self.observers.len())
            .finish()
    }
}
