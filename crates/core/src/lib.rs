//! Plot Calibration Core Library
//!
//! Axis calibration and curve selection for digitizing data from rendered plots.

pub mod calibration;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hit_test;
pub mod rotation;
pub mod selection;
pub mod session;

pub use calibration::{Axis, AxisCalibration, Bound, CalibrationSet, ScaleKind};
pub use config::EngineConfig;
pub use error::{CalibrationError, CalibrationResult};
pub use geometry::{AxisExtent, Curve, CurveId, PageCoordinate};
pub use hit_test::{nearest, nearest_hit, CurveHit, CurveHitTester, DisplayTransform, HitTestConfig};
pub use rotation::Rotation;
pub use selection::{
    SelectionMode, SelectionObserver, SelectionOutcome, SelectionState, SelectionStateMachine,
};
pub use session::{CalibrationSession, SessionId};
