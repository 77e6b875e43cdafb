//! Concrete hardware checks.
//!
//! Every probe is a struct holding `Arc<dyn Capability>` handles from
//! [`crate::platform`] and implementing [`crate::core::Probe`]. There is one
//! implementation per capability contract; variants of the same check
//! (frequency bands, vibration strengths, camera facings) are parameters,
//! not copies.

pub mod bluetooth;
pub mod camera;
pub mod geolocation;
pub mod microphone;
pub mod orientation;
pub mod screen;
pub mod sound;
pub mod touch;
pub mod vibration;

pub use bluetooth::BluetoothProbe;
pub use camera::CameraProbe;
pub use geolocation::GeolocationProbe;
pub use microphone::MicrophoneProbe;
pub use orientation::OrientationProbe;
pub use screen::{ColorScreenProbe, ResolutionProbe};
pub use sound::{FrequencyBand, SoundProbe};
pub use touch::TouchProbe;
pub use vibration::{VibrationProbe, VibrationStrength};

use crate::config::Settings;
use crate::platform::{CameraFacing, PlatformHandles};
use crate::registry::ProbeRegistry;
use std::sync::Arc;

/// Builds the standard registry from settings and platform handles.
///
/// Run order: screen, vibration, touch, orientation, geolocation,
/// bluetooth, sound bands, microphone, cameras. Disabled areas are simply
/// absent from the registry.
pub fn standard_registry(settings: &Settings, hw: &PlatformHandles) -> ProbeRegistry {
    let probes = &settings.probes;
    let mut registry = ProbeRegistry::new();

    if probes.screen.enabled {
        registry.register(Arc::new(ResolutionProbe::new(hw.display.clone())));
        registry.register(Arc::new(ColorScreenProbe::new(
            hw.display.clone(),
            hw.prompt.clone(),
        )));
    }
    if probes.vibration.enabled {
        for strength in [
            VibrationStrength::Short,
            VibrationStrength::Medium,
            VibrationStrength::Long,
        ] {
            registry.register(Arc::new(VibrationProbe::new(
                strength,
                hw.haptics.clone(),
                hw.prompt.clone(),
            )));
        }
    }
    if probes.touch.enabled {
        registry.register(Arc::new(TouchProbe::new(
            probes.touch.rows,
            probes.touch.cols,
            probes.touch.min_coverage,
            probes.touch.window,
            hw.touch.clone(),
        )));
    }
    if probes.orientation.enabled {
        registry.register(Arc::new(OrientationProbe::new(
            probes.orientation.min_coverage,
            hw.orientation.clone(),
        )));
    }
    if probes.geolocation.enabled {
        registry.register(Arc::new(GeolocationProbe::new(hw.geolocation.clone())));
    }
    if probes.bluetooth.enabled {
        registry.register(Arc::new(BluetoothProbe::new(hw.bluetooth.clone())));
    }
    if probes.sound.enabled {
        for band in [FrequencyBand::Low, FrequencyBand::Mid, FrequencyBand::High] {
            registry.register(Arc::new(SoundProbe::new(
                band,
                probes.sound.tone_duration,
                hw.audio.clone(),
                hw.prompt.clone(),
            )));
        }
    }
    if probes.microphone.enabled {
        registry.register(Arc::new(MicrophoneProbe::new(
            probes.microphone.recording_duration,
            hw.microphone.clone(),
            hw.audio.clone(),
            hw.prompt.clone(),
        )));
    }
    if probes.camera.enabled {
        for facing in [CameraFacing::Front, CameraFacing::Rear] {
            registry.register(Arc::new(CameraProbe::new(
                facing,
                hw.camera.clone(),
                hw.prompt.clone(),
            )));
        }
    }

    registry
}
