use crate::dirty::ChangeDetector;
use crate::error::TrackerError;
use crate::events::{ListenerId, Listeners};
use crate::source::SensorSources;
use crate::target::RotationTarget;
use crate::types::{OrientationSample, PermissionResponse, TrackerEvent};
use glam::DQuat;
use orient_transform::{compute_rotation, DEVICE_EULER_ORDER};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Connection to the platform sources.
enum Link {
    Disconnected,
    /// Connected, waiting for the permission gate.
    AwaitingPermission(oneshot::Receiver<PermissionResponse>),
    /// Connected and subscribed.
    Streaming(Subscription),
    /// Connected, but sensor access was refused.
    Blocked,
}

struct Subscription {
    orientation: watch::Receiver<OrientationSample>,
    screen: watch::Receiver<f64>,
}

impl Subscription {
    fn open(sources: &SensorSources) -> Self {
        Self {
            orientation: sources.orientation.subscribe(),
            screen: sources.screen.subscribe(),
        }
    }

    fn latest_sample(&mut self) -> Option<OrientationSample> {
        latest(&mut self.orientation)
    }

    fn latest_screen_angle(&mut self) -> Option<f64> {
        latest(&mut self.screen)
    }
}

/// Newest value if it changed since the last read. A closed source yields nothing.
fn latest<T: Copy>(rx: &mut watch::Receiver<T>) -> Option<T> {
    match rx.has_changed() {
        Ok(true) => Some(*rx.borrow_and_update()),
        _ => None,
    }
}

/// Drives a target's rotation from device orientation.
///
/// Sensor and screen sources push at their own pace; the tracker keeps only
/// the newest value of each. Call [`update`](Self::update) once per frame.
pub struct OrientationTracker<T: RotationTarget> {
    target: T,
    sources: SensorSources,
    link: Link,
    enabled: bool,
    /// Radians added to alpha.
    alpha_offset: f64,
    sample: Option<OrientationSample>,
    /// Degrees.
    screen_angle: f64,
    detector: ChangeDetector,
    listeners: Listeners,
    last_error: Option<TrackerError>,
}

impl<T: RotationTarget> OrientationTracker<T> {
    pub fn new(mut target: T, sources: SensorSources) -> Self {
        target.set_rotation_order(DEVICE_EULER_ORDER);
        Self {
            target,
            sources,
            link: Link::Disconnected,
            enabled: false,
            alpha_offset: 0.0,
            sample: None,
            screen_angle: 0.0,
            detector: ChangeDetector::new(),
            listeners: Listeners::new(),
            last_error: None,
        }
    }

    /// Subscribe to the sources (after the permission gate, if there is one).
    ///
    /// `enabled` becomes true right away, whatever the gate later answers.
    /// Calling this while already connected changes nothing else.
    pub fn connect(&mut self) {
        self.enabled = true;
        if !matches!(self.link, Link::Disconnected) {
            debug!("Already connected");
            return;
        }

        self.screen_angle = self.sources.screen.current_angle();
        self.last_error = None;

        let pending = self.sources.permission.as_mut().map(|gate| gate.request());
        self.link = match pending {
            Some(rx) => {
                info!("Waiting for device orientation permission");
                Link::AwaitingPermission(rx)
            }
            None => {
                info!(screen_angle = self.screen_angle, "Subscribed to device orientation");
                Link::Streaming(Subscription::open(&self.sources))
            }
        };
    }

    /// Unsubscribe from the sources and stop updating. Idempotent.
    ///
    /// A permission answer still in flight is discarded.
    pub fn disconnect(&mut self) {
        if !matches!(self.link, Link::Disconnected) {
            info!("Unsubscribed from device orientation");
        }
        self.link = Link::Disconnected;
        self.enabled = false;
    }

    pub fn dispose(&mut self) {
        self.disconnect();
    }

    /// Check a pending permission request without blocking.
    ///
    /// Returns `None` when nothing was pending or the answer has not arrived.
    pub fn poll_permission(&mut self) -> Option<Result<(), TrackerError>> {
        let Link::AwaitingPermission(rx) = &mut self.link else {
            return None;
        };
        let response = match rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => None,
        };
        Some(self.settle(response))
    }

    /// Wait for a pending permission request to be answered.
    pub async fn permission_settled(&mut self) -> Result<(), TrackerError> {
        let response = match &mut self.link {
            Link::AwaitingPermission(rx) => rx.await.ok(),
            Link::Blocked => {
                return Err(self
                    .last_error
                    .clone()
                    .unwrap_or(TrackerError::PermissionDenied))
            }
            Link::Streaming(_) | Link::Disconnected => return Ok(()),
        };
        self.settle(response)
    }

    fn settle(&mut self, response: Option<PermissionResponse>) -> Result<(), TrackerError> {
        let err = match response {
            Some(PermissionResponse::Granted) => {
                info!(
                    screen_angle = self.screen_angle,
                    "Permission granted, subscribed to device orientation"
                );
                self.link = Link::Streaming(Subscription::open(&self.sources));
                return Ok(());
            }
            Some(PermissionResponse::Denied) => TrackerError::PermissionDenied,
            Some(PermissionResponse::Failed(reason)) => TrackerError::PermissionFailed(reason),
            None => TrackerError::PermissionAbandoned,
        };
        error!(%err, "Unable to use device orientation");
        self.link = Link::Blocked;
        self.last_error = Some(err.clone());
        Err(err)
    }

    /// Apply the newest sample to the target. Returns true if a change event fired.
    ///
    /// Does nothing while disabled, while disconnected (even if re-enabled) or
    /// before the first sample arrives.
    pub fn update(&mut self) -> bool {
        // Denials are logged and kept in `last_error`.
        let _ = self.poll_permission();

        if !self.enabled || !self.is_connected() {
            return false;
        }

        if let Link::Streaming(subscription) = &mut self.link {
            if let Some(sample) = subscription.latest_sample() {
                self.sample = Some(sample);
            }
            if let Some(angle) = subscription.latest_screen_angle() {
                self.screen_angle = angle;
            }
        }

        let Some(sample) = self.sample else {
            return false;
        };

        let angles = sample.to_radians(self.alpha_offset);
        let rotation = compute_rotation(
            angles.alpha,
            angles.beta,
            angles.gamma,
            self.screen_angle.to_radians(),
        );
        self.target.set_rotation(rotation);

        if self.detector.observe(rotation) {
            debug!(?rotation, "Rotation changed");
            self.listeners.dispatch(TrackerEvent::Change);
            true
        } else {
            false
        }
    }

    /// Make the current heading the new forward direction.
    ///
    /// Returns false if no sample has been received yet.
    pub fn zero_heading(&mut self) -> bool {
        let Some(sample) = self.sample else {
            return false;
        };
        self.alpha_offset = -sample.alpha.map_or(0.0, f64::to_radians);
        info!(alpha_offset = self.alpha_offset, "Heading zeroed");
        true
    }

    pub fn add_listener(&mut self, listener: impl FnMut(TrackerEvent) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn alpha_offset(&self) -> f64 {
        self.alpha_offset
    }

    pub fn set_alpha_offset(&mut self, radians: f64) {
        self.alpha_offset = radians;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Pause or resume updates. Has no effect on a disconnected tracker.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self.link, Link::Disconnected)
    }

    /// Whether samples can actually arrive (connected and permitted).
    pub fn is_streaming(&self) -> bool {
        matches!(self.link, Link::Streaming(_))
    }

    pub fn last_error(&self) -> Option<&TrackerError> {
        self.last_error.as_ref()
    }

    pub fn sample(&self) -> Option<OrientationSample> {
        self.sample
    }

    /// Screen rotation in degrees.
    pub fn screen_angle(&self) -> f64 {
        self.screen_angle
    }

    pub fn rotation(&self) -> DQuat {
        self.target.rotation()
    }

    pub fn last_notified(&self) -> DQuat {
        self.detector.last_notified()
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}
