//! Configuration system using Figment.
//!
//! Strongly-typed settings loaded from:
//! 1. `selftest.toml` (base configuration, optional)
//! 2. Environment variables (prefixed with `SELFTEST_`)
//!
//! # Environment Variable Overrides
//!
//! Environment variables with the `SELFTEST_` prefix can override
//! configuration values:
//!
//! ```text
//! SELFTEST_APPLICATION.LOG_LEVEL=debug
//! SELFTEST_RUNNER.DEADLINE=45s
//! SELFTEST_PROBES.TOUCH.MIN_COVERAGE=1.0
//! ```
//!
//! Durations use humantime syntax (`30s`, `1m`, `500ms`). All values have
//! defaults, so the suite runs without any configuration file present.

use crate::error::{AppResult, SelfTestError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level settings for the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Application-level settings.
    #[serde(default)]
    pub application: ApplicationSettings,
    /// Run orchestration settings.
    #[serde(default)]
    pub runner: RunnerSettings,
    /// Per-probe enablement and tuning.
    #[serde(default)]
    pub probes: ProbeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application: ApplicationSettings::default(),
            runner: RunnerSettings::default(),
            probes: ProbeSettings::default(),
        }
    }
}

/// Application-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Application name shown in the report header.
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Run orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Per-probe deadline. A probe that has not resolved within this bound
    /// is recorded as failed and the run moves on.
    #[serde(with = "humantime_serde", default = "default_deadline")]
    pub deadline: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            deadline: default_deadline(),
        }
    }
}

/// Per-probe enablement and tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Screen resolution and color-cycle checks.
    #[serde(default)]
    pub screen: ToggleSettings,
    /// Vibration pattern checks.
    #[serde(default)]
    pub vibration: ToggleSettings,
    /// Touch grid coverage check.
    #[serde(default)]
    pub touch: TouchSettings,
    /// Orientation sweep check.
    #[serde(default)]
    pub orientation: OrientationSettings,
    /// Geolocation permission check.
    #[serde(default)]
    pub geolocation: ToggleSettings,
    /// Bluetooth adapter check.
    #[serde(default)]
    pub bluetooth: ToggleSettings,
    /// Frequency-band sound checks.
    #[serde(default)]
    pub sound: SoundSettings,
    /// Microphone record-and-playback check.
    #[serde(default)]
    pub microphone: MicrophoneSettings,
    /// Camera capture checks.
    #[serde(default)]
    pub camera: ToggleSettings,
}

/// Plain on/off switch for probes without tuning values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSettings {
    /// Whether the probe participates in the run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ToggleSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

/// Touch grid tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchSettings {
    /// Whether the probe participates in the run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Grid rows.
    #[serde(default = "default_touch_rows")]
    pub rows: usize,
    /// Grid columns.
    #[serde(default = "default_touch_cols")]
    pub cols: usize,
    /// Fraction of cells that must be touched, in (0, 1].
    #[serde(default = "default_touch_coverage")]
    pub min_coverage: f64,
    /// Sampling window before the check gives up.
    #[serde(with = "humantime_serde", default = "default_touch_window")]
    pub window: Duration,
}

impl Default for TouchSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            rows: default_touch_rows(),
            cols: default_touch_cols(),
            min_coverage: default_touch_coverage(),
            window: default_touch_window(),
        }
    }
}

/// Orientation sweep tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrientationSettings {
    /// Whether the probe participates in the run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fraction of angle segments that must be visited, in (0, 1].
    #[serde(default = "default_orientation_coverage")]
    pub min_coverage: f64,
}

impl Default for OrientationSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_coverage: default_orientation_coverage(),
        }
    }
}

/// Sound check tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundSettings {
    /// Whether the probes participate in the run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Length of each test tone.
    #[serde(with = "humantime_serde", default = "default_tone_duration")]
    pub tone_duration: Duration,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tone_duration: default_tone_duration(),
        }
    }
}

/// Microphone check tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrophoneSettings {
    /// Whether the probe participates in the run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Length of the captured clip.
    #[serde(with = "humantime_serde", default = "default_recording_duration")]
    pub recording_duration: Duration,
}

impl Default for MicrophoneSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            recording_duration: default_recording_duration(),
        }
    }
}

fn default_app_name() -> String {
    "Device Self-Test".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_deadline() -> Duration {
    Duration::from_secs(30)
}

fn default_enabled() -> bool {
    true
}

fn default_touch_rows() -> usize {
    16
}

fn default_touch_cols() -> usize {
    8
}

fn default_touch_coverage() -> f64 {
    0.85
}

fn default_touch_window() -> Duration {
    Duration::from_secs(20)
}

fn default_orientation_coverage() -> f64 {
    0.75
}

fn default_tone_duration() -> Duration {
    Duration::from_secs(1)
}

fn default_recording_duration() -> Duration {
    Duration::from_secs(5)
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file, and `SELFTEST_`
    /// environment overrides, then validates them.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        figment = match path {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment.merge(Toml::file("selftest.toml")),
        };
        let settings: Settings = figment
            .merge(Env::prefixed("SELFTEST_").split("."))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks semantic constraints the type system cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.runner.deadline.is_zero() {
            return Err(SelfTestError::Configuration(
                "runner.deadline must be greater than zero".to_string(),
            ));
        }
        if self.probes.touch.rows == 0 || self.probes.touch.cols == 0 {
            return Err(SelfTestError::Configuration(
                "probes.touch grid must have at least one row and column".to_string(),
            ));
        }
        for (key, coverage) in [
            ("probes.touch.min_coverage", self.probes.touch.min_coverage),
            (
                "probes.orientation.min_coverage",
                self.probes.orientation.min_coverage,
            ),
        ] {
            if !(coverage > 0.0 && coverage <= 1.0) {
                return Err(SelfTestError::Configuration(format!(
                    "{} must be within (0, 1], got {}",
                    key, coverage
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.runner.deadline, Duration::from_secs(30));
        assert_eq!(settings.probes.touch.rows, 16);
        assert_eq!(settings.probes.touch.cols, 8);
        assert!((settings.probes.orientation.min_coverage - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[runner]
deadline = "45s"

[probes.touch]
min_coverage = 1.0
rows = 4
cols = 4

[probes.microphone]
enabled = false
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.runner.deadline, Duration::from_secs(45));
        assert_eq!(settings.probes.touch.rows, 4);
        assert!((settings.probes.touch.min_coverage - 1.0).abs() < f64::EPSILON);
        assert!(!settings.probes.microphone.enabled);
        // Untouched values keep their defaults.
        assert!(settings.probes.sound.enabled);
    }

    #[test]
    fn out_of_range_coverage_is_rejected() {
        let mut settings = Settings::default();
        settings.probes.orientation.min_coverage = 1.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("min_coverage"));
    }

    #[test]
    fn zero_deadline_is_rejected() {
        let mut settings = Settings::default();
        settings.runner.deadline = Duration::ZERO;
        assert!(settings.validate().is_err());
    }
}
