//! Device orientation tracking for a scene camera.
//!
//! [`OrientationTracker`] turns the newest device orientation sample into a
//! rotation on a [`RotationTarget`] and emits [`TrackerEvent::Change`] only
//! when that rotation visibly moves.

pub mod dirty;
pub mod error;
pub mod events;
pub mod source;
pub mod target;
pub mod tracker;
pub mod types;

pub use dirty::{ChangeDetector, CHANGE_EPSILON};
pub use error::TrackerError;
pub use events::{ListenerId, Listeners};
pub use source::{
    ChannelOrientationSource, ChannelScreenSource, OrientationSource, PermissionGate,
    PermissionPrompt, PromptPermission, ScreenOrientationSource, SensorSources, StaticPermission,
};
pub use target::{Camera, RotationTarget};
pub use tracker::OrientationTracker;
pub use types::{DeviceAngles, OrientationSample, PermissionResponse, TrackerEvent};
