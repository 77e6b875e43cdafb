//! Platform capability traits consumed by probes.
//!
//! Each trait is a narrow seam over one hardware or user-interaction
//! capability. Probes hold `Arc<dyn Capability>` handles and acquire any
//! underlying resource (a microphone stream, a sensor subscription) inside
//! their own `execute`, releasing it before the verdict resolves; no handle
//! is shared across probe boundaries.
//!
//! Sensor capabilities expose their readings as `broadcast::Receiver`
//! streams so multiple consumers (a probe plus a live visualization) can
//! subscribe to the same source.

pub mod console;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

/// A captured audio clip.
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    /// Samples per second.
    pub sample_rate_hz: u32,
    /// Mono PCM samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
}

impl Recording {
    /// Clip length derived from the sample count.
    pub fn duration(&self) -> Duration {
        if self.sample_rate_hz == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate_hz as f64)
    }
}

/// A geolocation fix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Estimated accuracy in meters.
    pub accuracy_m: f64,
}

/// A touch contact point, normalized to the surface (0.0..=1.0 on each axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Horizontal position, 0.0 at the left edge.
    pub x: f64,
    /// Vertical position, 0.0 at the top edge.
    pub y: f64,
}

/// One orientation sensor reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationSample {
    /// Rotation around the vertical axis, degrees in [0, 360).
    pub alpha: f64,
    /// Front-back tilt, degrees in [0, 360) after normalization.
    pub beta: f64,
}

/// Colors cycled by the screen defect check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenColor {
    /// Full white, shows dark dead pixels.
    White,
    /// Full black, shows stuck-on pixels.
    Black,
    /// Pure red channel.
    Red,
    /// Pure green channel.
    Green,
    /// Pure blue channel.
    Blue,
}

impl ScreenColor {
    /// Display name used in verdict details.
    pub fn name(&self) -> &'static str {
        match self {
            ScreenColor::White => "White",
            ScreenColor::Black => "Black",
            ScreenColor::Red => "Red",
            ScreenColor::Green => "Green",
            ScreenColor::Blue => "Blue",
        }
    }

    /// The full cycle in test order.
    pub fn cycle() -> [ScreenColor; 5] {
        [
            ScreenColor::White,
            ScreenColor::Black,
            ScreenColor::Red,
            ScreenColor::Green,
            ScreenColor::Blue,
        ]
    }
}

/// Which camera a capture request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraFacing {
    /// User-facing camera.
    Front,
    /// Environment-facing camera.
    Rear,
}

impl CameraFacing {
    /// Display name used in probe names and details.
    pub fn name(&self) -> &'static str {
        match self {
            CameraFacing::Front => "Front",
            CameraFacing::Rear => "Rear",
        }
    }
}

/// A captured still frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Photo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Encoded frame bytes.
    pub bytes: Vec<u8>,
}

/// The single "user decision" suspension point.
///
/// A probe that needs a human confirmation suspends on `confirm` until the
/// answer arrives; there is no polling.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// Asks a yes/no question and waits for the answer.
    async fn confirm(&self, question: &str) -> Result<bool>;
}

/// Vibration motor control.
#[async_trait]
pub trait Haptics: Send + Sync {
    /// Whether a vibration motor is present.
    fn supported(&self) -> bool;

    /// Plays a vibration pattern of on-durations.
    async fn vibrate(&self, pattern: &[Duration]) -> Result<()>;
}

/// Speaker output.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Plays a sine tone at `frequency_hz` for `duration` with decaying gain.
    async fn play_tone(&self, frequency_hz: f64, duration: Duration) -> Result<()>;

    /// Plays back a captured recording.
    async fn play_recording(&self, recording: &Recording) -> Result<()>;
}

/// Microphone capture.
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Records a clip of the given length. The capture stream is owned by
    /// this call and released before it returns.
    async fn record(&self, duration: Duration) -> Result<Recording>;
}

/// Geolocation access.
#[async_trait]
pub trait Geolocation: Send + Sync {
    /// Whether a positioning service exists at all.
    fn supported(&self) -> bool;

    /// Requests the current position; errors on permission denial.
    async fn current_position(&self) -> Result<Position>;
}

/// Bluetooth adapter presence.
pub trait Bluetooth: Send + Sync {
    /// Whether a Bluetooth adapter is available.
    fn available(&self) -> bool;
}

/// Touch input surface.
#[async_trait]
pub trait TouchSurface: Send + Sync {
    /// Subscribes to the stream of touch contact points.
    async fn touch_stream(&self) -> Result<broadcast::Receiver<TouchPoint>>;
}

/// Orientation (gyroscope/accelerometer fusion) sensor.
#[async_trait]
pub trait OrientationSensor: Send + Sync {
    /// Whether orientation events are available.
    fn supported(&self) -> bool;

    /// Subscribes to the stream of orientation readings.
    async fn orientation_stream(&self) -> Result<broadcast::Receiver<OrientationSample>>;
}

/// Display surface.
#[async_trait]
pub trait Display: Send + Sync {
    /// Native resolution in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Fills the whole screen with a solid color.
    async fn fill(&self, color: ScreenColor) -> Result<()>;
}

/// Still camera access.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Captures one frame from the given camera; errors on access denial.
    async fn capture(&self, facing: CameraFacing) -> Result<Photo>;
}

/// Bundle of capability handles used to assemble the probe set.
#[derive(Clone)]
pub struct PlatformHandles {
    /// Human confirmation seam.
    pub prompt: std::sync::Arc<dyn UserPrompt>,
    /// Vibration motor.
    pub haptics: std::sync::Arc<dyn Haptics>,
    /// Speaker.
    pub audio: std::sync::Arc<dyn AudioOutput>,
    /// Microphone.
    pub microphone: std::sync::Arc<dyn Microphone>,
    /// Positioning service.
    pub geolocation: std::sync::Arc<dyn Geolocation>,
    /// Bluetooth adapter.
    pub bluetooth: std::sync::Arc<dyn Bluetooth>,
    /// Touch input surface.
    pub touch: std::sync::Arc<dyn TouchSurface>,
    /// Orientation sensor.
    pub orientation: std::sync::Arc<dyn OrientationSensor>,
    /// Display surface.
    pub display: std::sync::Arc<dyn Display>,
    /// Still camera.
    pub camera: std::sync::Arc<dyn Camera>,
}

impl PlatformHandles {
    /// Builds every handle from one mock platform instance.
    pub fn from_mock(platform: std::sync::Arc<mock::MockPlatform>) -> Self {
        Self {
            prompt: platform.clone(),
            haptics: platform.clone(),
            audio: platform.clone(),
            microphone: platform.clone(),
            geolocation: platform.clone(),
            bluetooth: platform.clone(),
            touch: platform.clone(),
            orientation: platform.clone(),
            display: platform.clone(),
            camera: platform,
        }
    }

    /// Replaces the confirmation seam (e.g., with an interactive console).
    pub fn with_prompt(mut self, prompt: std::sync::Arc<dyn UserPrompt>) -> Self {
        self.prompt = prompt;
        self
    }
}
