//! Device orientation to camera rotation.
//!
//! The W3C device orientation angles `alpha`, `beta` and `gamma` form a set of
//! intrinsic Tait-Bryan angles of type Z-X'-Y''. A scene camera wants the same
//! rotation expressed in its own frame: Y up, looking down -Z, with the screen
//! rotation of the UI taken into account. The conversion is three stages:
//!
//! 1. device orientation, re-expressed as intrinsic Y-X-Z Euler angles,
//! 2. a fixed -90° turn about X so the camera looks out the back of the device,
//! 3. a turn about the device's forward axis undoing the screen rotation.
//!
//! Inputs are radians. Nothing is clamped: NaN or out-of-range angles produce
//! an equally malformed quaternion.

use glam::{DQuat, DVec3, EulerRot};
use std::f64::consts::FRAC_1_SQRT_2;

/// Euler order of the device rotation (and of any target that interops with it).
pub const DEVICE_EULER_ORDER: EulerRot = EulerRot::YXZ;

/// -90° about X: the camera looks out the back of the device, not the top.
pub const CAMERA_BACK: DQuat = DQuat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Axis the screen rotates about.
pub const FORWARD_AXIS: DVec3 = DVec3::Z;

/// Rotation of the device itself.
///
/// `beta` goes on X, `alpha` on Y and `-gamma` on Z, applied in intrinsic
/// Y, X, Z order ('ZXY' for the device, 'YXZ' for the camera frame).
pub fn device_rotation(alpha: f64, beta: f64, gamma: f64) -> DQuat {
    DQuat::from_euler(DEVICE_EULER_ORDER, alpha, beta, -gamma)
}

/// Rotation compensating for a UI rotated by `screen` radians.
pub fn screen_compensation(screen: f64) -> DQuat {
    DQuat::from_axis_angle(FORWARD_AXIS, -screen)
}

/// Full camera rotation for a device orientation and screen angle.
///
/// `alpha` must already include any heading offset.
pub fn compute_rotation(alpha: f64, beta: f64, gamma: f64, screen: f64) -> DQuat {
    device_rotation(alpha, beta, gamma) * CAMERA_BACK * screen_compensation(screen)
}
