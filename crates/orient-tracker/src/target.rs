use glam::{DMat4, DQuat, DVec3, EulerRot};
use std::cell::RefCell;
use std::rc::Rc;

/// Scene object whose rotation the tracker drives.
pub trait RotationTarget {
    fn rotation(&self) -> DQuat;
    fn set_rotation(&mut self, rotation: DQuat);
    /// Euler order used when the object's rotation is read or written as angles.
    fn set_rotation_order(&mut self, order: EulerRot);
}

/// Camera for rendering the scene.
///
/// Position is fixed at the origin. Only orientation changes (from the device).
#[derive(Debug, Clone)]
pub struct Camera {
    /// Device orientation in camera space.
    pub orientation: DQuat,
    /// Order for Euler-angle interop.
    pub rotation_order: EulerRot,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            orientation: DQuat::IDENTITY,
            rotation_order: EulerRot::XYZ,
        }
    }

    /// Direction the camera looks (-Z in camera space).
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    /// Orientation as Euler angles in `rotation_order`.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        self.orientation.to_euler(self.rotation_order)
    }

    /// View matrix (inverse of camera world transform).
    pub fn view_matrix(&self) -> DMat4 {
        // Camera is at origin, only rotated.
        DMat4::from_quat(self.orientation.conjugate())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationTarget for Camera {
    fn rotation(&self) -> DQuat {
        self.orientation
    }

    fn set_rotation(&mut self, rotation: DQuat) {
        self.orientation = rotation;
    }

    fn set_rotation_order(&mut self, order: EulerRot) {
        self.rotation_order = order;
    }
}

/// Shared target, so change listeners can read the rotation the tracker wrote.
impl<T: RotationTarget> RotationTarget for Rc<RefCell<T>> {
    fn rotation(&self) -> DQuat {
        self.borrow().rotation()
    }

    fn set_rotation(&mut self, rotation: DQuat) {
        self.borrow_mut().set_rotation(rotation);
    }

    fn set_rotation_order(&mut self, order: EulerRot) {
        self.borrow_mut().set_rotation_order(order);
    }
}
