/// Raw device orientation reading, as delivered by the sensor source.
///
/// Angles are in degrees. Any field may be missing; a missing angle counts as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    /// Heading about Z (0 to 360).
    pub alpha: Option<f64>,
    /// Front-back tilt about X' (-180 to 180).
    pub beta: Option<f64>,
    /// Left-right tilt about Y'' (-90 to 90).
    pub gamma: Option<f64>,
}

impl OrientationSample {
    /// Sample with all three angles present.
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// Convert to radians, adding `alpha_offset` (radians) to the heading.
    pub fn to_radians(&self, alpha_offset: f64) -> DeviceAngles {
        DeviceAngles {
            alpha: self.alpha.map_or(0.0, f64::to_radians) + alpha_offset,
            beta: self.beta.map_or(0.0, f64::to_radians),
            gamma: self.gamma.map_or(0.0, f64::to_radians),
        }
    }
}

/// Device orientation in radians, ready for the transform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Events emitted by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// The target rotation moved past the change threshold.
    Change,
}

/// Answer from a permission gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
    /// The platform could not even ask (unsupported, insecure context, ...).
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn missing_fields_are_zero() {
        let angles = OrientationSample::default().to_radians(0.0);
        assert_eq!(angles, DeviceAngles::default());
    }

    #[test]
    fn degrees_become_radians() {
        let angles = OrientationSample::new(90.0, 180.0, -90.0).to_radians(0.0);
        assert_relative_eq!(angles.alpha, FRAC_PI_2);
        assert_relative_eq!(angles.beta, PI);
        assert_relative_eq!(angles.gamma, -FRAC_PI_2);
    }

    #[test]
    fn offset_applies_to_heading_only() {
        let sample = OrientationSample {
            alpha: None,
            beta: Some(10.0),
            gamma: None,
        };
        let angles = sample.to_radians(0.5);
        assert_relative_eq!(angles.alpha, 0.5);
        assert_relative_eq!(angles.beta, 10.0_f64.to_radians());
        assert_relative_eq!(angles.gamma, 0.0);
    }
}
