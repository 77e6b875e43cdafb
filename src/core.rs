//! Core traits and data types for the self-test suite.
//!
//! This module defines the foundational abstractions the orchestration engine
//! is built around:
//!
//! - [`Probe`]: a single asynchronous hardware/capability check
//! - [`Verdict`]: the immutable outcome of one probe
//! - [`RunReport`]: the ordered collection of verdicts for one full run
//! - [`RunState`]: the orchestrator's state machine states
//! - [`RunEvent`]: observer events published over a broadcast channel
//!
//! # Data Flow
//!
//! ```text
//! Orchestrator --[RunEvent]--> broadcast::channel ---> Reporters/CLI/UI
//! ```
//!
//! # Thread Safety
//!
//! `Probe` requires `Send + Sync` to enable safe concurrent access across
//! async tasks, even though the orchestrator runs probes strictly one at a
//! time. Event streaming uses Tokio's `broadcast` channels for multi-consumer
//! patterns.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single hardware/capability check.
///
/// A probe is a named, asynchronous, zero-argument operation. Its `execute`
/// future resolves to a [`Verdict`], returns an error (e.g., permission
/// denied), or never resolves at all when it depends on a human confirmation
/// that never arrives. The orchestrator therefore always races probe
/// execution against a deadline; see [`crate::timeout::TimeoutGuard`].
///
/// Probes acquire any hardware handle (microphone stream, camera, sensor
/// subscription) inside `execute` and release it before resolving. No state
/// is shared between probe invocations.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Stable identifier, used for registry listing and default reporting.
    fn name(&self) -> String;

    /// Runs the check to completion and produces a verdict.
    ///
    /// An `Err` here means the underlying operation was rejected (not that
    /// the hardware failed the check); the timeout guard converts it into a
    /// failing verdict. `execute` must not panic.
    async fn execute(&self) -> Result<Verdict>;
}

/// The immutable outcome of one probe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Reported name. Usually the probe's registry name, but a probe may
    /// report a more specific sub-name (e.g., a frequency band).
    pub name: String,
    /// Whether the check passed.
    pub success: bool,
    /// Human-readable explanation of the outcome.
    pub details: String,
}

impl Verdict {
    /// Creates a passing verdict.
    pub fn pass(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: true,
            details: details.into(),
        }
    }

    /// Creates a failing verdict.
    pub fn fail(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            details: details.into(),
        }
    }
}

/// The ordered collection of verdicts for one full pass through the registry.
///
/// Created empty at the start of a run, appended to after each probe, and
/// final once the registry is exhausted. Never mutated after completion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// UTC timestamp when the run started.
    pub started_at: DateTime<Utc>,
    /// UTC timestamp when the run finished, if it has.
    pub finished_at: Option<DateTime<Utc>>,
    /// Verdicts in registry order, one per probe.
    pub verdicts: Vec<Verdict>,
}

impl RunReport {
    /// Creates an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            verdicts: Vec::new(),
        }
    }

    /// Appends a verdict. Only the orchestrator calls this, in registry order.
    pub(crate) fn push(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    /// Stamps the report as final.
    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of verdicts recorded so far.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// True when no verdicts have been recorded.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Number of passing verdicts.
    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.success).count()
    }

    /// Number of failing verdicts.
    pub fn failed(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.success).count()
    }

    /// True when every probe passed. An empty report counts as all-passed.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrator state machine states.
///
/// Transitions: `Idle -> Running(0) -> ... -> Running(n-1) -> Completed`,
/// then back to `Idle` via an explicit reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No run has started, or the last run was reset.
    Idle,
    /// A run is executing the probe at the contained registry index.
    Running(usize),
    /// A run finished; its report is available until the next reset.
    Completed,
}

/// Observer events published by the orchestrator during a run.
#[derive(Clone, Debug)]
pub enum RunEvent {
    /// The probe at `index` is about to execute.
    ProbeStarting {
        /// Registry index of the probe.
        index: usize,
        /// The probe's registry name.
        name: String,
    },
    /// The probe at `index` completed (pass, fail, rejection, or timeout).
    ProbeCompleted {
        /// Registry index of the probe.
        index: usize,
        /// Total number of probes in the run.
        total: usize,
        /// The recorded verdict.
        verdict: Verdict,
    },
    /// The registry is exhausted and the report is final.
    RunCompleted {
        /// Number of passing verdicts.
        passed: usize,
        /// Number of failing verdicts.
        failed: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_constructors() {
        let v = Verdict::pass("Vibration", "Vibration API supported");
        assert!(v.success);
        assert_eq!(v.name, "Vibration");

        let v = Verdict::fail("Geolocation", "Geolocation access denied");
        assert!(!v.success);
        assert_eq!(v.details, "Geolocation access denied");
    }

    #[test]
    fn report_counts() {
        let mut report = RunReport::new();
        assert!(report.is_empty());
        assert!(report.all_passed());

        report.push(Verdict::pass("A", "ok"));
        report.push(Verdict::fail("B", "timed out after 30 seconds"));
        report.push(Verdict::fail("C", "denied"));

        assert_eq!(report.len(), 3);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 2);
        assert!(!report.all_passed());
        assert!(report.finished_at.is_none());

        report.finish();
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn report_serializes() {
        let mut report = RunReport::new();
        report.push(Verdict::pass("Bluetooth", "Bluetooth access granted"));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("Bluetooth access granted"));
    }
}
