use crate::error::{CalibrationError, Result};
use crate::math::{Point3, Position, Vector3, UNDEFINED_POSITION};

use super::GeodesicResult;

/// Physical size of a pixel (voxel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// Same spacing along every axis.
    Uniform(f64),
    /// Spacing along x, y and z.
    PerAxis(Vector3),
}

impl Default for Calibration {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl Calibration {
    /// Spacing along each axis.
    #[must_use]
    pub fn spacing(&self) -> Vector3 {
        match *self {
            Self::Uniform(s) => Vector3::new(s, s, s),
            Self::PerAxis(v) => v,
        }
    }

    /// Checks that every spacing is finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::InvalidSpacing` with the offending value.
    pub fn validate(&self) -> Result<()> {
        match self
            .spacing()
            .iter()
            .find(|s| !(s.is_finite() && **s > 0.0))
        {
            Some(&bad) => Err(CalibrationError::InvalidSpacing(bad).into()),
            None => Ok(()),
        }
    }

    /// Physical coordinates of a pixel center.
    #[must_use]
    pub fn to_physical(&self, p: Position) -> Point3 {
        let s = self.spacing();
        Point3::new(
            f64::from(p.x) * s.x,
            f64::from(p.y) * s.y,
            f64::from(p.z) * s.z,
        )
    }

    /// Converts a length measured in pixels. Lengths along arbitrary
    /// directions use the x spacing; infinity and NaN pass through.
    #[must_use]
    pub fn length(&self, pixels: f64) -> f64 {
        pixels * self.spacing().x
    }
}

/// A [`GeodesicResult`] expressed in physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedResult {
    /// Geodesic diameter; infinite when the region is not connected.
    pub diameter: f64,
    /// Radius of the inscribed circle (ball).
    pub inner_radius: f64,
    /// Center of the inscribed circle, `None` when undefined.
    pub center: Option<Point3>,
    /// First geodesic extremity, `None` when undefined.
    pub first_extremity: Option<Point3>,
    /// Second geodesic extremity, `None` when undefined.
    pub second_extremity: Option<Point3>,
    /// Longest geodesic path, when computed.
    pub path: Option<Vec<Point3>>,
}

impl GeodesicResult {
    /// Converts pixel-unit measurements to physical units.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::InvalidSpacing` for a non-positive or
    /// non-finite spacing.
    pub fn calibrated(&self, calibration: &Calibration) -> Result<CalibratedResult> {
        calibration.validate()?;
        let locate = |p: Position| (p != UNDEFINED_POSITION).then(|| calibration.to_physical(p));
        Ok(CalibratedResult {
            diameter: calibration.length(self.diameter),
            inner_radius: calibration.length(self.inner_radius),
            center: locate(self.center),
            first_extremity: locate(self.first_extremity),
            second_extremity: locate(self.second_extremity),
            path: self
                .path
                .as_ref()
                .map(|path| path.iter().map(|&p| calibration.to_physical(p)).collect()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(diameter: f64) -> GeodesicResult {
        GeodesicResult {
            diameter,
            inner_radius: 2.0,
            center: Position::new(1, 2, 0),
            first_extremity: Position::new(0, 0, 0),
            second_extremity: Position::new(4, 0, 0),
            path: Some(vec![Position::new(4, 0, 0), Position::new(0, 0, 0)]),
        }
    }

    #[test]
    fn uniform_scaling() {
        let c = sample(5.0).calibrated(&Calibration::Uniform(0.5)).unwrap();
        assert_relative_eq!(c.diameter, 2.5);
        assert_relative_eq!(c.inner_radius, 1.0);
        let center = c.center.unwrap();
        assert_relative_eq!(center.y, 1.0);
        assert_eq!(c.path.unwrap().len(), 2);
    }

    #[test]
    fn per_axis_positions() {
        let cal = Calibration::PerAxis(Vector3::new(2.0, 3.0, 4.0));
        let c = sample(5.0).calibrated(&cal).unwrap();
        assert_relative_eq!(c.diameter, 10.0);
        let center = c.center.unwrap();
        assert_relative_eq!(center.x, 2.0);
        assert_relative_eq!(center.y, 6.0);
    }

    #[test]
    fn infinity_survives_conversion() {
        let c = sample(f64::INFINITY)
            .calibrated(&Calibration::Uniform(0.25))
            .unwrap();
        assert!(c.diameter.is_infinite());
    }

    #[test]
    fn undefined_positions_become_none() {
        let mut r = sample(f64::INFINITY);
        r.center = UNDEFINED_POSITION;
        r.inner_radius = f64::NAN;
        let c = r.calibrated(&Calibration::default()).unwrap();
        assert!(c.center.is_none());
        assert!(c.inner_radius.is_nan());
    }

    #[test]
    fn invalid_spacing_rejected() {
        assert!(Calibration::Uniform(0.0).validate().is_err());
        assert!(Calibration::PerAxis(Vector3::new(1.0, -1.0, 1.0))
            .validate()
            .is_err());
        assert!(Calibration::Uniform(f64::NAN).validate().is_err());
    }
}
