//! Engine configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use crate::calibration::ScaleKind;
use crate::error::{CalibrationError, CalibrationResult};
use crate::hit_test::HitTestConfig;
use std::path::Path;

/// Settings applied when a calibration session is created
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pick behaviour for pointer selection
    pub hit_test: HitTestConfig,

    /// Scale kind each axis starts with and returns to on reset
    pub default_scale_kind: ScaleKind,

    /// Rotation in degrees the session starts at
    pub initial_rotation: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_test: HitTestConfig::default(),
            default_scale_kind: ScaleKind::Linear,
            initial_rotation: 0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> CalibrationResult<Self> {
        serde_json::from_str(json).map_err(|e| CalibrationError::Config(e.to_string()))
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> CalibrationResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CalibrationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
