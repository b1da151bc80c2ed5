//! Discrete page rotation and the raw-to-axis-space normalizer

use crate::error::{CalibrationError, CalibrationResult};
use crate::geometry::PageCoordinate;

/// Clockwise view rotation, as reported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Parse a rotation in degrees, reduced modulo 360
    ///
    /// Negative values wrap, so -90 is 270.
    pub fn from_degrees(degrees: i32) -> CalibrationResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            _ => Err(CalibrationError::InvalidRotation(degrees)),
        }
    }

    /// Rotation angle in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Map a raw renderer coordinate into axis space
    pub fn normalize(self, raw: PageCoordinate) -> PageCoordinate {
        match self {
            Rotation::R0 => raw,
            Rotation::R90 => PageCoordinate::new(raw.y, -raw.x),
            Rotation::R180 => PageCoordinate::new(-raw.x, -raw.y),
            Rotation::R270 => PageCoordinate::new(-raw.y, raw.x),
        }
    }

    /// Inverse of [`Rotation::normalize`]
    pub fn denormalize(self, axis: PageCoordinate) -> PageCoordinate {
        match self {
            Rotation::R0 => axis,
            Rotation::R90 => PageCoordinate::new(-axis.y, axis.x),
            Rotation::R180 => PageCoordinate::new(-axis.x, -axis.y),
            Rotation::R270 => PageCoordinate::new(axis.y, -axis.x),
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = CalibrationError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl serde::Serialize for Rotation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> serde::Deserialize<'de> for Rotation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = i32::deserialize(deserializer)?;
        Rotation::from_degrees(degrees).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    #[test]
    fn test_from_degrees_wraps() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::R0);
        assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::R90);
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::R270);
        assert_eq!(Rotation::from_degrees(720).unwrap(), Rotation::R0);
    }

    #[test]
    fn test_from_degrees_rejects_off_grid() {
        assert_eq!(Rotation::from_degrees(45), Err(CalibrationError::InvalidRotation(45)));
        assert!(Rotation::try_from(91).is_err());
    }

    #[test]
    fn test_normalize_table() {
        let p = PageCoordinate::new(3.0, 7.0);
        assert_eq!(Rotation::R0.normalize(p), PageCoordinate::new(3.0, 7.0));
        assert_eq!(Rotation::R90.normalize(p), PageCoordinate::new(7.0, -3.0));
        assert_eq!(Rotation::R180.normalize(p), PageCoordinate::new(-3.0, -7.0));
        assert_eq!(Rotation::R270.normalize(p), PageCoordinate::new(-7.0, 3.0));
    }

    #[test]
    fn test_normalize_is_bijective() {
        let samples = [
            PageCoordinate::new(0.0, 0.0),
            PageCoordinate::new(12.5, -3.25),
            PageCoordinate::new(-612.0, 792.0),
            PageCoordinate::new(1e-7, 4e6),
        ];

        for rotation in ALL {
            for p in samples {
                let back = rotation.denormalize(rotation.normalize(p));
                assert!((back.x - p.x).abs() < 1e-9, "{rotation:?} x");
                assert!((back.y - p.y).abs() < 1e-9, "{rotation:?} y");
            }
        }
    }

    #[test]
    fn test_serde_uses_degrees() {
        let json = serde_json::to_string(&Rotation::R270).unwrap();
        assert_eq!(json, "270");

        let parsed: Rotation = serde_json::from_str("-180").unwrap();
        assert_eq!(parsed, Rotation::R180);

        assert!(serde_json::from_str::<Rotation>("30").is_err());
    }
}
