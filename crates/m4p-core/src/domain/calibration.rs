//! Per-deployment coordinate calibration.
//!
//! The remote reports absolute positions in a fixed range (roughly
//! 0..1914 × 0..1074 on current TVs).  A [`CalibrationProfile`] scales that
//! range onto the local display.  Deployments differ: a 1080p desktop uses
//! about `1.00313 × 1.00559`, a 4K desktop at 150 % scaling about
//! `0.66876 × 0.67039`.  The factors are configuration, never constants.

use thiserror::Error;

/// Rejected calibration factors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("scale_x must be finite and greater than zero, got {0}")]
    InvalidScaleX(f64),
    #[error("scale_y must be finite and greater than zero, got {0}")]
    InvalidScaleY(f64),
}

/// Component-wise scale from device coordinates to local pixels.
///
/// Invariant: both factors are finite and `> 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    scale_x: f64,
    scale_y: f64,
}

impl CalibrationProfile {
    /// Passes raw device coordinates through unchanged.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Builds a profile, validating both factors.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] when a factor is zero, negative, NaN or
    /// infinite.
    pub fn new(scale_x: f64, scale_y: f64) -> Result<Self, CalibrationError> {
        if !(scale_x.is_finite() && scale_x > 0.0) {
            return Err(CalibrationError::InvalidScaleX(scale_x));
        }
        if !(scale_y.is_finite() && scale_y > 0.0) {
            return Err(CalibrationError::InvalidScaleY(scale_y));
        }
        Ok(Self { scale_x, scale_y })
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Maps a raw coordinate pair to pixels.
    ///
    /// Each product is truncated toward zero; results beyond `i32` saturate.
    pub fn apply(&self, raw: [i32; 2]) -> (i32, i32) {
        let x = f64::from(raw[0]) * self.scale_x;
        let y = f64::from(raw[1]) * self.scale_y;
        (x as i32, y as i32)
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_positive_factors() {
        let profile = CalibrationProfile::new(2.0, 0.5).unwrap();
        assert_eq!(profile.scale_x(), 2.0);
        assert_eq!(profile.scale_y(), 0.5);
    }

    #[test]
    fn test_new_rejects_zero_negative_and_non_finite() {
        assert_eq!(
            CalibrationProfile::new(0.0, 1.0),
            Err(CalibrationError::InvalidScaleX(0.0))
        );
        assert_eq!(
            CalibrationProfile::new(1.0, -1.0),
            Err(CalibrationError::InvalidScaleY(-1.0))
        );
        assert!(CalibrationProfile::new(f64::NAN, 1.0).is_err());
        assert!(CalibrationProfile::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_apply_scales_component_wise() {
        let profile = CalibrationProfile::new(2.0, 0.5).unwrap();
        assert_eq!(profile.apply([100, 200]), (200, 100));
    }

    #[test]
    fn test_apply_truncates_toward_zero() {
        let profile = CalibrationProfile::new(1.5, 1.5).unwrap();
        assert_eq!(profile.apply([3, -3]), (4, -4));
    }

    #[test]
    fn test_apply_1080p_profile_reaches_panel_edge() {
        // Device max 1914×1074 should land on the last 1920×1080 pixel.
        let profile = CalibrationProfile::new(1.00313479624, 1.00558659218).unwrap();
        assert_eq!(profile.apply([1914, 1074]), (1920, 1080));
    }

    #[test]
    fn test_apply_saturates_instead_of_wrapping() {
        let profile = CalibrationProfile::new(4.0, 4.0).unwrap();
        assert_eq!(profile.apply([i32::MAX, i32::MIN]), (i32::MAX, i32::MIN));
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(CalibrationProfile::default().apply([7, 9]), (7, 9));
    }
}
