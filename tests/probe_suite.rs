//! Full-suite runs against scripted mock platforms.

use selftest::config::Settings;
use selftest::dialog::DialogBoard;
use selftest::orchestrator::Orchestrator;
use selftest::platform::mock::{touch_grid_sweep, MockPlatform, PermissionMode};
use selftest::platform::PlatformHandles;
use selftest::probes::standard_registry;
use selftest::progress::LogReporter;
use selftest::registry::ProbeRegistry;
use selftest::timeout::TimeoutGuard;
use std::sync::Arc;

fn orchestrate(registry: ProbeRegistry, deadline: std::time::Duration) -> Orchestrator {
    Orchestrator::new(
        registry,
        TimeoutGuard::new(deadline),
        Arc::new(DialogBoard::new()),
        Arc::new(LogReporter),
    )
}

fn suite_settings() -> Settings {
    let mut settings = Settings::default();
    // Instant clips keep the suite fast; behavior is unchanged.
    settings.probes.microphone.recording_duration = std::time::Duration::from_millis(50);
    settings
}

#[tokio::test]
async fn healthy_device_passes_every_check() {
    let settings = suite_settings();
    let hw = PlatformHandles::from_mock(Arc::new(MockPlatform::agreeable()));
    let registry = standard_registry(&settings, &hw);
    let names = registry.names();

    let orchestrator = orchestrate(registry, settings.runner.deadline);
    let report = orchestrator.start().await.unwrap();

    assert_eq!(report.len(), 15);
    assert_eq!(report.failed(), 0, "failures: {:?}", report.verdicts);
    let reported: Vec<_> = report.verdicts.iter().map(|v| v.name.clone()).collect();
    assert_eq!(reported, names);
}

#[tokio::test]
async fn broken_device_fails_every_check_yet_the_run_completes() {
    let platform = MockPlatform::agreeable()
        .with_default_confirmation(false)
        .without_haptics()
        .without_bluetooth()
        .without_orientation()
        .with_geolocation(PermissionMode::Denied)
        .with_microphone(PermissionMode::Denied)
        .with_camera(PermissionMode::Denied)
        .with_resolution(0, 0)
        .with_touch_script(touch_grid_sweep(16, 8, 0.25));

    let settings = suite_settings();
    let hw = PlatformHandles::from_mock(Arc::new(platform));
    let registry = standard_registry(&settings, &hw);

    let orchestrator = orchestrate(registry, settings.runner.deadline);
    let report = orchestrator.start().await.unwrap();

    // Failure is data: every probe still ran and reported.
    assert_eq!(report.len(), 15);
    assert_eq!(report.passed(), 0, "passes: {:?}", report.verdicts);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn mixed_device_reports_exactly_the_broken_areas() {
    let platform = MockPlatform::agreeable()
        .without_bluetooth()
        .with_geolocation(PermissionMode::Denied);

    let settings = suite_settings();
    let hw = PlatformHandles::from_mock(Arc::new(platform));
    let registry = standard_registry(&settings, &hw);

    let orchestrator = orchestrate(registry, settings.runner.deadline);
    let report = orchestrator.start().await.unwrap();

    assert_eq!(report.failed(), 2);
    let failed: Vec<_> = report
        .verdicts
        .iter()
        .filter(|v| !v.success)
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(failed, vec!["Geolocation", "Bluetooth"]);
}

#[tokio::test]
async fn rerun_after_reset_reflects_new_platform_state() {
    // Same registry, two runs: confirmations flip between runs via the
    // scripted queue, everything else stays healthy.
    let platform = Arc::new(
        MockPlatform::agreeable()
            // First run: reject the five color screens.
            .with_confirmations([false, false, false, false, false]),
    );
    let mut settings = suite_settings();
    settings.probes.vibration.enabled = false;
    settings.probes.sound.enabled = false;
    settings.probes.microphone.enabled = false;
    settings.probes.camera.enabled = false;
    settings.probes.touch.enabled = false;
    settings.probes.orientation.enabled = false;

    let hw = PlatformHandles::from_mock(platform);
    let registry = standard_registry(&settings, &hw);
    let orchestrator = orchestrate(registry, settings.runner.deadline);

    let first = orchestrator.start().await.unwrap();
    assert_eq!(first.failed(), 1);
    assert!(first.verdicts[1].details.starts_with("Defects found in:"));

    orchestrator.reset().unwrap();
    // Queue drained; the default answer (yes) applies on the rerun.
    let second = orchestrator.start().await.unwrap();
    assert_eq!(second.failed(), 0);
}
