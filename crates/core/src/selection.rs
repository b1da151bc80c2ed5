//! Selection modes and routing of picked curves
//!
//! The machine tracks one selection target at a time. A curve picked while
//! waiting for an axis becomes that axis's reference; a curve picked in free
//! selection is handed to the labeling layer through [`SelectionOutcome`].

use crate::calibration::{Axis, CalibrationSet};
use crate::error::{CalibrationError, CalibrationResult};
use crate::geometry::{Curve, CurveId, PageCoordinate};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Idle,
    /// Next picked curve becomes the reference for this axis
    AwaitingAxisSelection(Axis),
    /// Picked curves go to the labeling layer
    FreeSelecting,
}

/// Transient hover/selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub hovered_curve: Option<CurveId>,
    pub selected_curve: Option<CurveId>,
    pub mode: SelectionMode,
}

/// Result of a click, delivered to the caller and to observers
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Click landed while idle; nothing is routed
    Ignored,
    /// No curve within the pick threshold
    Missed,
    /// Curve stored as the axis reference
    AxisCalibrated { axis: Axis, curve_id: CurveId },
    /// Curve was rejected as the axis reference
    CalibrationFailed { axis: Axis, curve_id: CurveId, error: CalibrationError },
    /// Curve picked for labeling
    ///
    /// `values` holds the curve converted to data space when the session is
    /// calibrated, `None` otherwise.
    Labeled { curve: Curve, values: Option<CalibrationResult<Vec<PageCoordinate>>> },
}

/// Receives selection outcomes synchronously, in registration order
pub trait SelectionObserver {
    fn on_selection(&mut self, outcome: &SelectionOutcome);
}

/// Mode transitions for calibration and free selection
#[derive(Debug, Default)]
pub struct SelectionStateMachine {
    state: SelectionState,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.mode
    }

    /// Wait for the next picked curve to define `axis`
    pub fn begin_calibration(&mut self, axis: Axis) {
        log::debug!("selection mode {:?} -> awaiting {axis} axis", self.state.mode);
        self.state.mode = SelectionMode::AwaitingAxisSelection(axis);
    }

    /// Switch free selection on or off
    ///
    /// Toggling while waiting for an axis abandons that calibration step.
    pub fn toggle_free_selection(&mut self) -> SelectionMode {
        let next = match self.state.mode {
            SelectionMode::FreeSelecting => SelectionMode::Idle,
            SelectionMode::Idle | SelectionMode::AwaitingAxisSelection(_) => {
                SelectionMode::FreeSelecting
            }
        };

        log::debug!("selection mode {:?} -> {next:?}", self.state.mode);
        self.set_mode(next);
        next
    }

    /// Return to idle without routing anything
    pub fn cancel(&mut self) {
        self.set_mode(SelectionMode::Idle);
    }

    fn set_mode(&mut self, mode: SelectionMode) {
        self.state.mode = mode;
        if mode == SelectionMode::Idle {
            self.state.hovered_curve = None;
        }
    }

    /// Record the curve under the pointer; ignored while idle
    pub fn hover(&mut self, curve_id: Option<CurveId>) {
        self.state.hovered_curve = match self.state.mode {
            SelectionMode::Idle => None,
            _ => curve_id,
        };
    }

    /// Route a click result according to the current mode
    ///
    /// In axis selection the mode returns to idle whether or not the curve
    /// was accepted; a miss keeps waiting.
    pub fn click(
        &mut self,
        picked: Option<&Curve>,
        calibration: &mut CalibrationSet,
    ) -> SelectionOutcome {
        let mode = self.state.mode;
        if mode == SelectionMode::Idle {
            return SelectionOutcome::Ignored;
        }

        let Some(curve) = picked else {
            return SelectionOutcome::Missed;
        };

        self.state.selected_curve = Some(curve.id);

        match mode {
            SelectionMode::Idle => SelectionOutcome::Ignored,
            SelectionMode::AwaitingAxisSelection(axis) => {
                self.set_mode(SelectionMode::Idle);

                match calibration.set_reference_curve(axis, curve) {
                    Ok(()) => SelectionOutcome::AxisCalibrated { axis, curve_id: curve.id },
                    Err(error) => SelectionOutcome::CalibrationFailed {
                        axis,
                        curve_id: curve.id,
                        error,
                    },
                }
            }
            SelectionMode::FreeSelecting => {
                let values: Option<CalibrationResult<Vec<PageCoordinate>>> =
                    calibration.is_calibrated().then(|| {
                        curve.points.iter().map(|p| calibration.convert(*p)).collect()
                    });

                SelectionOutcome::Labeled { curve: curve.clone(), values }
            }
        }
    }
}
