//! A mock platform that simulates every hardware capability.
//!
//! The mock is scripted and deterministic: confirmations come from a queue,
//! sensor streams replay prepared samples through broadcast channels (fed by
//! a spawned task, the same shape a real sensor backend would have), and
//! audio capture synthesizes a sine clip with seeded noise. Tests and the
//! `--yes` CLI mode build the whole suite against one of these.

use super::{
    AudioOutput, Bluetooth, Camera, CameraFacing, Display, Geolocation, Haptics, Microphone,
    OrientationSample, OrientationSensor, Photo, Position, Recording, ScreenColor, TouchPoint,
    TouchSurface, UserPrompt,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;

/// How the mock answers a permission-gated request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionMode {
    /// Requests succeed.
    Granted,
    /// Requests fail with an access-denied error.
    Denied,
    /// The capability does not exist on this device.
    Unsupported,
}

/// Scripted implementation of all platform capabilities.
pub struct MockPlatform {
    confirmations: Mutex<VecDeque<bool>>,
    default_confirmation: bool,
    haptics_supported: bool,
    geolocation: PermissionMode,
    bluetooth_available: bool,
    microphone: PermissionMode,
    camera: PermissionMode,
    resolution: (u32, u32),
    orientation_supported: bool,
    touch_script: Vec<TouchPoint>,
    orientation_script: Vec<OrientationSample>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::agreeable()
    }
}

impl MockPlatform {
    /// A device on which every check passes: all capabilities present, all
    /// permissions granted, full touch and orientation coverage, every
    /// confirmation answered yes.
    pub fn agreeable() -> Self {
        Self {
            confirmations: Mutex::new(VecDeque::new()),
            default_confirmation: true,
            haptics_supported: true,
            geolocation: PermissionMode::Granted,
            bluetooth_available: true,
            microphone: PermissionMode::Granted,
            camera: PermissionMode::Granted,
            resolution: (1080, 2400),
            orientation_supported: true,
            touch_script: touch_grid_sweep(16, 8, 1.0),
            orientation_script: orientation_sweep(1.0),
        }
    }

    /// Queues explicit answers for upcoming confirmations. Once the queue is
    /// drained the default answer applies.
    pub fn with_confirmations(self, answers: impl IntoIterator<Item = bool>) -> Self {
        {
            let mut queue = lock(&self.confirmations);
            queue.extend(answers);
        }
        self
    }

    /// Sets the answer used once the scripted queue is drained.
    pub fn with_default_confirmation(mut self, answer: bool) -> Self {
        self.default_confirmation = answer;
        self
    }

    /// Removes the vibration motor.
    pub fn without_haptics(mut self) -> Self {
        self.haptics_supported = false;
        self
    }

    /// Sets geolocation behavior.
    pub fn with_geolocation(mut self, mode: PermissionMode) -> Self {
        self.geolocation = mode;
        self
    }

    /// Removes the Bluetooth adapter.
    pub fn without_bluetooth(mut self) -> Self {
        self.bluetooth_available = false;
        self
    }

    /// Sets microphone behavior.
    pub fn with_microphone(mut self, mode: PermissionMode) -> Self {
        self.microphone = mode;
        self
    }

    /// Sets camera behavior.
    pub fn with_camera(mut self, mode: PermissionMode) -> Self {
        self.camera = mode;
        self
    }

    /// Overrides the reported screen resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width, height);
        self
    }

    /// Removes the orientation sensor.
    pub fn without_orientation(mut self) -> Self {
        self.orientation_supported = false;
        self
    }

    /// Replaces the scripted touch contact points.
    pub fn with_touch_script(mut self, script: Vec<TouchPoint>) -> Self {
        self.touch_script = script;
        self
    }

    /// Replaces the scripted orientation readings.
    pub fn with_orientation_script(mut self, script: Vec<OrientationSample>) -> Self {
        self.orientation_script = script;
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Replays a prepared script into a broadcast channel from a spawned task,
/// mirroring how a real sensor backend feeds subscribers.
fn replay<T: Clone + Send + 'static>(script: Vec<T>) -> broadcast::Receiver<T> {
    let capacity = script.len().max(16);
    let (sender, receiver) = broadcast::channel(capacity);
    tokio::spawn(async move {
        for item in script {
            // Stop if every subscriber has been dropped.
            if sender.send(item).is_err() {
                break;
            }
            tokio::task::yield_now().await;
        }
    });
    receiver
}

/// Touch points sweeping cell centers of a `rows` x `cols` grid, covering
/// the leading `fraction` of cells in row-major order.
pub fn touch_grid_sweep(rows: usize, cols: usize, fraction: f64) -> Vec<TouchPoint> {
    let limit = ((rows * cols) as f64 * fraction).round() as usize;
    let mut points = Vec::with_capacity(limit);
    'outer: for row in 0..rows {
        for col in 0..cols {
            if points.len() >= limit {
                break 'outer;
            }
            points.push(TouchPoint {
                x: (col as f64 + 0.5) / cols as f64,
                y: (row as f64 + 0.5) / rows as f64,
            });
        }
    }
    points
}

/// Orientation readings sweeping segment centers of the 36 x 18 angle grid,
/// covering the leading `fraction` of segments.
pub fn orientation_sweep(fraction: f64) -> Vec<OrientationSample> {
    let limit = (648.0 * fraction).round() as usize;
    let mut samples = Vec::with_capacity(limit);
    'outer: for alpha_bin in 0..36 {
        for beta_bin in 0..18 {
            if samples.len() >= limit {
                break 'outer;
            }
            samples.push(OrientationSample {
                alpha: alpha_bin as f64 * 10.0 + 5.0,
                beta: beta_bin as f64 * 10.0 + 5.0,
            });
        }
    }
    samples
}

#[async_trait]
impl UserPrompt for MockPlatform {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let answer = lock(&self.confirmations)
            .pop_front()
            .unwrap_or(self.default_confirmation);
        log::debug!("Mock confirmation '{}': {}", question, answer);
        Ok(answer)
    }
}

#[async_trait]
impl Haptics for MockPlatform {
    fn supported(&self) -> bool {
        self.haptics_supported
    }

    async fn vibrate(&self, pattern: &[Duration]) -> Result<()> {
        if !self.haptics_supported {
            return Err(anyhow!("no vibration motor present"));
        }
        log::debug!("Mock vibration pattern: {:?}", pattern);
        Ok(())
    }
}

#[async_trait]
impl AudioOutput for MockPlatform {
    async fn play_tone(&self, frequency_hz: f64, duration: Duration) -> Result<()> {
        log::debug!(
            "Mock tone: {} Hz for {} ms",
            frequency_hz,
            duration.as_millis()
        );
        Ok(())
    }

    async fn play_recording(&self, recording: &Recording) -> Result<()> {
        log::debug!(
            "Mock playback: {} samples at {} Hz",
            recording.samples.len(),
            recording.sample_rate_hz
        );
        Ok(())
    }
}

#[async_trait]
impl Microphone for MockPlatform {
    async fn record(&self, duration: Duration) -> Result<Recording> {
        match self.microphone {
            PermissionMode::Granted => {}
            PermissionMode::Denied => return Err(anyhow!("microphone access denied by user")),
            PermissionMode::Unsupported => return Err(anyhow!("no microphone present")),
        }

        // Synthesize the clip immediately; a 440 Hz tone with seeded noise
        // stands in for captured audio.
        let sample_rate_hz = 8_000u32;
        let count = (sample_rate_hz as f64 * duration.as_secs_f64()) as usize;
        let mut rng = StdRng::seed_from_u64(0x5e1f);
        let samples = (0..count)
            .map(|i| {
                let t = i as f64 / sample_rate_hz as f64;
                let tone = (t * 440.0 * std::f64::consts::TAU).sin() * 0.5;
                let noise = rng.gen_range(-0.05..0.05);
                (tone + noise) as f32
            })
            .collect();
        Ok(Recording {
            sample_rate_hz,
            samples,
        })
    }
}

#[async_trait]
impl Geolocation for MockPlatform {
    fn supported(&self) -> bool {
        self.geolocation != PermissionMode::Unsupported
    }

    async fn current_position(&self) -> Result<Position> {
        match self.geolocation {
            PermissionMode::Granted => Ok(Position {
                latitude: 52.52,
                longitude: 13.405,
                accuracy_m: 12.0,
            }),
            PermissionMode::Denied => Err(anyhow!("geolocation access denied by user")),
            PermissionMode::Unsupported => Err(anyhow!("no positioning service present")),
        }
    }
}

impl Bluetooth for MockPlatform {
    fn available(&self) -> bool {
        self.bluetooth_available
    }
}

#[async_trait]
impl TouchSurface for MockPlatform {
    async fn touch_stream(&self) -> Result<broadcast::Receiver<TouchPoint>> {
        Ok(replay(self.touch_script.clone()))
    }
}

#[async_trait]
impl OrientationSensor for MockPlatform {
    fn supported(&self) -> bool {
        self.orientation_supported
    }

    async fn orientation_stream(&self) -> Result<broadcast::Receiver<OrientationSample>> {
        if !self.orientation_supported {
            return Err(anyhow!("orientation events not available"));
        }
        Ok(replay(self.orientation_script.clone()))
    }
}

#[async_trait]
impl Display for MockPlatform {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    async fn fill(&self, color: ScreenColor) -> Result<()> {
        log::debug!("Mock screen fill: {}", color.name());
        Ok(())
    }
}

#[async_trait]
impl Camera for MockPlatform {
    async fn capture(&self, facing: CameraFacing) -> Result<Photo> {
        match self.camera {
            PermissionMode::Granted => Ok(Photo {
                width: 1280,
                height: 720,
                bytes: vec![0u8; 64],
            }),
            PermissionMode::Denied => Err(anyhow!(
                "{} camera access denied by user",
                facing.name().to_lowercase()
            )),
            PermissionMode::Unsupported => {
                Err(anyhow!("no {} camera present", facing.name().to_lowercase()))
            }
        }
    }
}
