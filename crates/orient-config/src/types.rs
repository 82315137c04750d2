use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tracker configuration.
    pub tracker: TrackerConfig,
    /// Simulated device used by the demo host.
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Heading offset added to alpha, in radians. Re-zeroes "forward".
    pub alpha_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Frames per second driving `update()`.
    pub frame_rate_hz: u32,
    /// Orientation samples per second pushed by the simulated sensor.
    pub sensor_rate_hz: u32,
    /// How long to run before disposing the tracker.
    pub duration_secs: f64,
    /// Heading sweep speed in degrees per second.
    pub heading_rate_deg: f64,
    /// Peak front-back tilt in degrees, swinging around upright.
    pub tilt_amplitude_deg: f64,
    /// Screen rotation reported at startup (0, 90, 180 or 270).
    pub screen_angle_deg: f64,
    /// How the simulated platform answers the permission prompt.
    pub permission: PermissionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            sensor_rate_hz: 50,
            duration_secs: 5.0,
            heading_rate_deg: 30.0,
            tilt_amplitude_deg: 20.0,
            screen_angle_deg: 0.0,
            permission: PermissionMode::None,
        }
    }
}

impl SimulationConfig {
    /// Time between rendered frames.
    pub fn frame_period(&self) -> Duration {
        period(self.frame_rate_hz)
    }

    /// Time between simulated sensor samples.
    pub fn sensor_period(&self) -> Duration {
        period(self.sensor_rate_hz)
    }

    /// Run length, or `None` to run until interrupted (negative or non-finite).
    pub fn run_for(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.duration_secs).ok()
    }
}

/// A rate of 0 is treated as 1 Hz.
fn period(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// No permission gate; subscribe straight away.
    None,
    /// Gate present and the user grants access.
    Grant,
    /// Gate present and the user refuses.
    Deny,
}
