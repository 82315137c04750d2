use glam::DQuat;

/// Threshold on [`ChangeDetector::distance`] above which a change is reported.
pub const CHANGE_EPSILON: f64 = 1e-6;

/// Decides when a rotation has moved enough to notify listeners.
///
/// For unit quaternions `8 * (1 - a·b)` is roughly the squared angle between
/// the two rotations, so the epsilon sits around a milliradian.
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    last_notified: DQuat,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            last_notified: DQuat::IDENTITY,
        }
    }

    pub fn distance(a: DQuat, b: DQuat) -> f64 {
        8.0 * (1.0 - a.dot(b))
    }

    /// Record `rotation` and return true if it differs from the last notified one.
    pub fn observe(&mut self, rotation: DQuat) -> bool {
        if Self::distance(self.last_notified, rotation) > CHANGE_EPSILON {
            self.last_notified = rotation;
            true
        } else {
            false
        }
    }

    pub fn last_notified(&self) -> DQuat {
        self.last_notified
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}
