//! Platform collaborators feeding the tracker.
//!
//! Sensor and screen sources hand out `watch` receivers: the tracker only ever
//! sees the latest value, and dropping the receiver unsubscribes. The channel
//! implementations here are what a host wires its platform callbacks into.

use crate::types::{OrientationSample, PermissionResponse};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Source of device orientation events.
pub trait OrientationSource {
    /// Start receiving samples. Samples pushed before this call are not seen.
    fn subscribe(&self) -> watch::Receiver<OrientationSample>;
}

/// Source of screen rotation angles (degrees).
pub trait ScreenOrientationSource {
    /// The angle right now.
    fn current_angle(&self) -> f64;
    /// Start receiving rotation changes.
    fn subscribe(&self) -> watch::Receiver<f64>;
}

/// Platform permission prompt guarding sensor access.
pub trait PermissionGate {
    /// Ask for access. The answer may arrive at any later point, or never.
    fn request(&mut self) -> oneshot::Receiver<PermissionResponse>;
}

/// The collaborators a tracker is built with.
pub struct SensorSources {
    pub orientation: Box<dyn OrientationSource>,
    pub screen: Box<dyn ScreenOrientationSource>,
    /// `None` on platforms that grant sensor access unconditionally.
    pub permission: Option<Box<dyn PermissionGate>>,
}

impl SensorSources {
    /// Sources without a permission gate.
    pub fn new(
        orientation: impl OrientationSource + 'static,
        screen: impl ScreenOrientationSource + 'static,
    ) -> Self {
        Self {
            orientation: Box::new(orientation),
            screen: Box::new(screen),
            permission: None,
        }
    }

    pub fn with_permission(mut self, gate: impl PermissionGate + 'static) -> Self {
        self.permission = Some(Box::new(gate));
        self
    }
}

/// Orientation source backed by a watch channel. Clones share the channel.
#[derive(Clone)]
pub struct ChannelOrientationSource {
    tx: Arc<watch::Sender<OrientationSample>>,
}

impl ChannelOrientationSource {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(OrientationSample::default());
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new sample, replacing any unread one.
    pub fn push(&self, sample: OrientationSample) {
        self.tx.send_replace(sample);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelOrientationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationSource for ChannelOrientationSource {
    fn subscribe(&self) -> watch::Receiver<OrientationSample> {
        self.tx.subscribe()
    }
}

/// Screen rotation source backed by a watch channel. Clones share the channel.
#[derive(Clone)]
pub struct ChannelScreenSource {
    tx: Arc<watch::Sender<f64>>,
}

impl ChannelScreenSource {
    pub fn new(angle: f64) -> Self {
        let (tx, _) = watch::channel(angle);
        Self { tx: Arc::new(tx) }
    }

    /// Report that the UI rotated to `angle` degrees.
    pub fn rotate(&self, angle: f64) {
        self.tx.send_replace(angle);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelScreenSource {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScreenOrientationSource for ChannelScreenSource {
    fn current_angle(&self) -> f64 {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }
}

/// Gate that answers every request immediately.
#[derive(Debug, Clone)]
pub struct StaticPermission(pub PermissionResponse);

impl PermissionGate for StaticPermission {
    fn request(&mut self) -> oneshot::Receiver<PermissionResponse> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(self.0.clone());
        rx
    }
}

/// Gate whose requests stay open until a [`PermissionPrompt`] answers them.
pub struct PromptPermission {
    requests: mpsc::UnboundedSender<oneshot::Sender<PermissionResponse>>,
}

/// The user side of a [`PromptPermission`].
pub struct PermissionPrompt {
    requests: mpsc::UnboundedReceiver<oneshot::Sender<PermissionResponse>>,
    pending: Vec<oneshot::Sender<PermissionResponse>>,
}

impl PromptPermission {
    pub fn new() -> (Self, PermissionPrompt) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { requests: tx },
            PermissionPrompt {
                requests: rx,
                pending: Vec::new(),
            },
        )
    }
}

impl PermissionGate for PromptPermission {
    fn request(&mut self) -> oneshot::Receiver<PermissionResponse> {
        let (tx, rx) = oneshot::channel();
        if self.requests.send(tx).is_err() {
            tracing::warn!("Permission prompt is gone, request will never be answered");
        }
        rx
    }
}

impl PermissionPrompt {
    fn collect(&mut self) {
        while let Ok(responder) = self.requests.try_recv() {
            self.pending.push(responder);
        }
        self.pending.retain(|responder| !responder.is_closed());
    }

    /// Number of requests still waiting for an answer.
    pub fn pending(&mut self) -> usize {
        self.collect();
        self.pending.len()
    }

    /// Answer the oldest open request. Returns false if there was nobody to answer.
    pub fn answer(&mut self, response: PermissionResponse) -> bool {
        self.collect();
        if self.pending.is_empty() {
            return false;
        }
        self.pending.remove(0).send(response).is_ok()
    }
}
