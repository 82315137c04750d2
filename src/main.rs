use anyhow::Result;
use orient_config::{AppConfig, PermissionMode, SimulationConfig};
use orient_tracker::{
    Camera, ChannelOrientationSource, ChannelScreenSource, OrientationSample,
    OrientationTracker, PermissionPrompt, PermissionResponse, PromptPermission, SensorSources,
};
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// How long the simulated user takes to answer the permission prompt.
const PROMPT_DELAY: Duration = Duration::from_millis(250);

/// Tilt oscillation frequency of the simulated handset.
const TILT_HZ: f64 = 0.25;

type SharedCamera = Rc<RefCell<Camera>>;

/// Simulated handset held upright: heading sweeps, tilt swings around vertical.
fn simulated_sample(sim: &SimulationConfig, t: f64) -> OrientationSample {
    let alpha = (sim.heading_rate_deg * t).rem_euclid(360.0);
    let beta = 90.0 + sim.tilt_amplitude_deg * (TAU * TILT_HZ * t).sin();
    OrientationSample {
        alpha: Some(alpha),
        beta: Some(beta),
        // Many handsets leave gamma out while upright.
        gamma: None,
    }
}

/// Background task: publish simulated samples at the sensor rate.
async fn sensor_loop(source: ChannelOrientationSource, sim: SimulationConfig) {
    let mut ticker = tokio::time::interval(sim.sensor_period());
    let start = Instant::now();
    loop {
        ticker.tick().await;
        source.push(simulated_sample(&sim, start.elapsed().as_secs_f64()));
    }
}

/// Background task: the "user" taps a button on the permission prompt.
async fn answer_prompt(mut prompt: PermissionPrompt, response: PermissionResponse) {
    tokio::time::sleep(PROMPT_DELAY).await;
    if !prompt.answer(response) {
        warn!("Permission prompt had no open request");
    }
}

/// Wait for the permission prompt, then drive `update()` once per frame until
/// the configured run length elapses. `frames` counts rendered frames, so the
/// count survives the future being dropped on Ctrl-C.
async fn run_tracker(
    tracker: &mut OrientationTracker<SharedCamera>,
    sim: &SimulationConfig,
    frames: &mut u64,
) {
    if let Err(e) = tracker.permission_settled().await {
        warn!(%e, "Running without head tracking");
    }

    let mut ticker = tokio::time::interval(sim.frame_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let deadline = sim.run_for().map(|run_for| Instant::now() + run_for);

    while deadline.map_or(true, |deadline| Instant::now() < deadline) {
        ticker.tick().await;
        tracker.update();
        *frames += 1;
        if *frames % 300 == 0 {
            debug!(frames = *frames, "Frame heartbeat");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orient_cam=info,orient_tracker=info".into()),
        )
        .init();

    info!("orient-cam starting");

    // Load config.
    let config = orient_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    let sim = config.simulation.clone();

    info!(
        frame_rate_hz = sim.frame_rate_hz,
        sensor_rate_hz = sim.sensor_rate_hz,
        permission = ?sim.permission,
        "Config loaded"
    );

    let sensor = ChannelOrientationSource::new();
    let screen = ChannelScreenSource::new(sim.screen_angle_deg);
    let mut sources = SensorSources::new(sensor.clone(), screen);

    let response = match sim.permission {
        PermissionMode::None => None,
        PermissionMode::Grant => Some(PermissionResponse::Granted),
        PermissionMode::Deny => Some(PermissionResponse::Denied),
    };
    if let Some(response) = response {
        let (gate, prompt) = PromptPermission::new();
        sources = sources.with_permission(gate);
        tokio::spawn(answer_prompt(prompt, response));
    }

    let camera: SharedCamera = Rc::new(RefCell::new(Camera::new()));
    let mut tracker = OrientationTracker::new(Rc::clone(&camera), sources);
    tracker.set_alpha_offset(config.tracker.alpha_offset);

    let changes = Rc::new(Cell::new(0u64));
    {
        let camera = Rc::clone(&camera);
        let changes = Rc::clone(&changes);
        tracker.add_listener(move |_| {
            changes.set(changes.get() + 1);
            let forward = camera.borrow().forward();
            debug!(x = forward.x, y = forward.y, z = forward.z, "Camera moved");
        });
    }

    let sensor_task = tokio::spawn(sensor_loop(sensor, sim.clone()));

    tracker.connect();

    let mut frames: u64 = 0;
    tokio::select! {
        _ = run_tracker(&mut tracker, &sim, &mut frames) => {}
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Interrupted"),
            Err(e) => error!(?e, "Failed to listen for Ctrl-C"),
        },
    }

    tracker.dispose();
    sensor_task.abort();

    let forward = camera.borrow().forward();
    info!(
        frames,
        changes = changes.get(),
        forward_x = forward.x,
        forward_y = forward.y,
        forward_z = forward.z,
        "Tracker disposed"
    );

    // Save config on exit.
    if let Err(e) = orient_config::save_config(&config) {
        error!(?e, "Failed to save config");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orient_tracker::{StaticPermission, TrackerError};

    #[test]
    fn simulated_handset_starts_upright() {
        let sample = simulated_sample(&SimulationConfig::default(), 0.0);
        assert_eq!(sample.alpha, Some(0.0));
        assert_eq!(sample.beta, Some(90.0));
        assert_eq!(sample.gamma, None);
    }

    #[tokio::test]
    async fn denied_permission_still_runs_frames() {
        let sim = SimulationConfig {
            frame_rate_hz: 200,
            duration_secs: 0.05,
            ..Default::default()
        };
        let sensor = ChannelOrientationSource::new();
        let sources = SensorSources::new(sensor.clone(), ChannelScreenSource::default())
            .with_permission(StaticPermission(PermissionResponse::Denied));
        let camera: SharedCamera = Rc::new(RefCell::new(Camera::new()));
        let mut tracker = OrientationTracker::new(Rc::clone(&camera), sources);
        tracker.connect();
        sensor.push(simulated_sample(&sim, 0.0));

        let mut frames = 0;
        run_tracker(&mut tracker, &sim, &mut frames).await;
        assert!(frames > 0);
        assert!(!tracker.is_streaming());
        assert!(tracker.sample().is_none());
        assert_eq!(tracker.last_error(), Some(&TrackerError::PermissionDenied));
    }

    #[test]
    fn heading_wraps_past_full_turn() {
        let sim = SimulationConfig {
            heading_rate_deg: 100.0,
            ..Default::default()
        };
        let alpha = simulated_sample(&sim, 4.0).alpha.unwrap();
        assert_relative_eq!(alpha, 40.0, epsilon = 1e-9);
    }
}
