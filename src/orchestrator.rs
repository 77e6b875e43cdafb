//! Sequential test orchestration.
//!
//! The orchestrator drives the registry in order: for each probe it clears
//! prior dialog state, races the probe against the deadline, appends the
//! verdict, and publishes progress. Probe failure is data, not an
//! orchestration error; one probe's rejection or timeout can never prevent
//! subsequent probes from running. Probes execute strictly one at a time so
//! that only one dialog and one hardware resource is live at any instant.

use crate::core::{RunEvent, RunReport, RunState};
use crate::dialog::DialogLifecycle;
use crate::error::{AppResult, SelfTestError};
use crate::progress::ProgressReporter;
use crate::registry::ProbeRegistry;
use crate::timeout::TimeoutGuard;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Capacity of the observer event channel. Slow subscribers that lag behind
/// simply miss events; the run report is the authoritative record.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Drives a full pass through the probe registry.
///
/// State machine: `Idle -> Running(i) -> Completed -> (reset) -> Idle`.
/// `start` is rejected while a run is in progress, and `reset` is rejected
/// until the run has completed.
pub struct Orchestrator {
    registry: ProbeRegistry,
    guard: TimeoutGuard,
    dialogs: Arc<dyn DialogLifecycle>,
    reporter: Arc<dyn ProgressReporter>,
    events: broadcast::Sender<RunEvent>,
    state: Mutex<RunState>,
    last_report: Mutex<Option<RunReport>>,
}

impl Orchestrator {
    /// Creates an orchestrator over a registry with the given collaborators.
    pub fn new(
        registry: ProbeRegistry,
        guard: TimeoutGuard,
        dialogs: Arc<dyn DialogLifecycle>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            registry,
            guard,
            dialogs,
            reporter,
            events,
            state: Mutex::new(RunState::Idle),
            last_report: Mutex::new(None),
        }
    }

    /// Subscribes to observer events for the current and future runs.
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.events.subscribe()
    }

    /// Current state machine state.
    pub fn state(&self) -> RunState {
        *self.lock_state()
    }

    /// The report of the last completed run, if any.
    pub fn last_report(&self) -> Option<RunReport> {
        match self.last_report.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Runs every registered probe sequentially and returns the final report.
    ///
    /// Valid from `Idle` or `Completed`; returns
    /// [`SelfTestError::RunInProgress`] while `Running` without touching the
    /// in-flight run. An empty registry completes immediately with an empty
    /// report.
    pub async fn start(&self) -> AppResult<RunReport> {
        {
            let mut state = self.lock_state();
            if matches!(*state, RunState::Running(_)) {
                return Err(SelfTestError::RunInProgress);
            }
            *state = RunState::Running(0);
        }

        let total = self.registry.count();
        log::info!("Starting self-test run with {} probes", total);

        // Backstop against anything a previous run left visible.
        self.dialogs.teardown_all();

        let mut report = RunReport::new();
        for index in 0..total {
            *self.lock_state() = RunState::Running(index);

            // Registry is immutable during the run, so this lookup can only
            // fail on a logic bug. Fail fast rather than fake a verdict,
            // but release the state machine so the caller is not wedged.
            let Some(probe) = self.registry.at(index) else {
                return Err(self.abandon_run(index));
            };

            self.dialogs.prepare(index);
            let name = probe.name();
            log::info!("Running probe {}/{}: {}", index + 1, total, name);
            let _ = self.events.send(RunEvent::ProbeStarting {
                index,
                name: name.clone(),
            });

            let verdict = self.guard.run(probe.as_ref()).await;
            report.push(verdict.clone());

            let next = self.registry.at(index + 1).map(|p| p.name());
            self.reporter
                .report(index, total, &verdict, next.as_deref());
            let _ = self.events.send(RunEvent::ProbeCompleted {
                index,
                total,
                verdict,
            });
        }

        self.dialogs.teardown_all();
        report.finish();
        log::info!(
            "Self-test run complete: {} passed, {} failed",
            report.passed(),
            report.failed()
        );
        let _ = self.events.send(RunEvent::RunCompleted {
            passed: report.passed(),
            failed: report.failed(),
        });

        self.store_report(report.clone());
        *self.lock_state() = RunState::Completed;
        Ok(report)
    }

    /// Clears all state for a fresh run.
    ///
    /// Valid from `Completed` or `Idle` (idempotent); returns
    /// [`SelfTestError::ResetWhileRunning`] during a run. Never auto-starts
    /// the next run.
    pub fn reset(&self) -> AppResult<()> {
        let mut state = self.lock_state();
        if matches!(*state, RunState::Running(_)) {
            return Err(SelfTestError::ResetWhileRunning);
        }
        *state = RunState::Idle;
        drop(state);

        match self.last_report.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        self.dialogs.teardown_all();
        log::info!("Self-test state reset");
        Ok(())
    }

    /// Aborts a run that cannot continue: restores `Idle` and hides any
    /// dialog the run left visible, then produces the registry error.
    fn abandon_run(&self, index: usize) -> SelfTestError {
        *self.lock_state() = RunState::Idle;
        self.dialogs.teardown_all();
        log::error!("Run abandoned: no probe at index {}", index);
        SelfTestError::Registry(format!("no probe at index {}", index))
    }

    fn store_report(&self, report: RunReport) {
        match self.last_report.lock() {
            Ok(mut guard) => *guard = Some(report),
            Err(poisoned) => *poisoned.into_inner() = Some(report),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
