use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("Device orientation permission was denied")]
    PermissionDenied,
    #[error("Unable to use device orientation: {0}")]
    PermissionFailed(String),
    #[error("Permission request was dropped without an answer")]
    PermissionAbandoned,
}
