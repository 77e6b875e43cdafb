//! Device self-test CLI.
//!
//! Runs the full probe registry sequentially, streaming per-probe progress
//! to the terminal and printing the final report. Hardware actions are
//! simulated by the mock platform; in interactive mode the confirmation
//! questions are answered on the console, while `--yes` answers everything
//! affirmatively for unattended runs.

use clap::Parser;
use selftest::config::Settings;
use selftest::core::RunEvent;
use selftest::device_info::DeviceInfo;
use selftest::dialog::DialogBoard;
use selftest::error::AppResult;
use selftest::orchestrator::Orchestrator;
use selftest::platform::console::ConsolePrompt;
use selftest::platform::mock::MockPlatform;
use selftest::platform::PlatformHandles;
use selftest::probes::standard_registry;
use selftest::progress::LogReporter;
use selftest::timeout::TimeoutGuard;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Interactive hardware self-test suite.
#[derive(Parser, Debug)]
#[command(name = "selftest", version, about)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./selftest.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-probe deadline in seconds, overriding the configured value.
    #[arg(short, long)]
    deadline: Option<u64>,

    /// List the registered probes and exit without running.
    #[arg(short, long)]
    list: bool,

    /// Answer every confirmation with yes (unattended run).
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(seconds) = cli.deadline {
        settings.runner.deadline = Duration::from_secs(seconds);
        settings.validate()?;
    }

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.application.log_level.clone())),
        )
        .init();

    let platform = Arc::new(MockPlatform::agreeable());
    let mut hw = PlatformHandles::from_mock(platform);
    if !cli.yes {
        hw = hw.with_prompt(Arc::new(ConsolePrompt::new()));
    }

    let registry = standard_registry(&settings, &hw);
    if cli.list {
        for (index, name) in registry.names().iter().enumerate() {
            println!("{:2}. {}", index + 1, name);
        }
        return Ok(());
    }

    println!("{}", settings.application.name);
    println!("{}", "=".repeat(settings.application.name.len()));
    for (label, value) in DeviceInfo::collect(Some(hw.display.as_ref())).rows() {
        println!("{:>18}: {}", label, value);
    }
    println!();

    let orchestrator = Orchestrator::new(
        registry,
        TimeoutGuard::new(settings.runner.deadline),
        Arc::new(DialogBoard::new()),
        Arc::new(LogReporter),
    );

    let mut events = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                RunEvent::ProbeStarting { index, name } => {
                    println!("[{}] running: {}", index + 1, name);
                }
                RunEvent::ProbeCompleted { verdict, .. } => {
                    println!(
                        "    {}  {}",
                        if verdict.success { "PASS" } else { "FAIL" },
                        verdict.details
                    );
                }
                RunEvent::RunCompleted { .. } => break,
            }
        }
    });

    let report = orchestrator.start().await?;
    let _ = printer.await;

    println!();
    println!("Results");
    println!("-------");
    for verdict in &report.verdicts {
        println!(
            "{}  {:<28} {}",
            if verdict.success { "PASS" } else { "FAIL" },
            verdict.name,
            verdict.details
        );
    }
    println!();
    println!("{} passed, {} failed", report.passed(), report.failed());

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
