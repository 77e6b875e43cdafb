//! Progress reporting for a run.
//!
//! The progress computation (fraction of probes completed) is a pure
//! function; only the sink that renders it is a UI concern. Reporters are
//! called exactly once per completed probe, in increasing index order.

use crate::core::{RunEvent, Verdict};
use tokio::sync::broadcast;

/// Overall fractional progress after `completed` out of `total` probes.
///
/// Returns 0.0 for an empty registry rather than dividing by zero.
pub fn fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}

/// Sink for per-probe completion updates.
pub trait ProgressReporter: Send + Sync {
    /// Publishes the outcome of the probe at `index`.
    ///
    /// `next_probe` is the name of the probe about to run, for UI labeling;
    /// `None` after the last probe.
    fn report(&self, index: usize, total: usize, verdict: &Verdict, next_probe: Option<&str>);
}

/// Reporter that writes structured progress to the log.
#[derive(Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, index: usize, total: usize, verdict: &Verdict, next_probe: Option<&str>) {
        let percent = (fraction(index + 1, total) * 100.0).round();
        log::info!(
            "[{}/{} {:.0}%] {} {}: {}",
            index + 1,
            total,
            percent,
            if verdict.success { "PASS" } else { "FAIL" },
            verdict.name,
            verdict.details
        );
        if let Some(next) = next_probe {
            log::info!("Next up: {}", next);
        }
    }
}

/// Reporter that forwards completion events over a broadcast channel.
pub struct ChannelReporter {
    sender: broadcast::Sender<RunEvent>,
}

impl ChannelReporter {
    /// Wraps an event sender.
    pub fn new(sender: broadcast::Sender<RunEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, index: usize, total: usize, verdict: &Verdict, _next_probe: Option<&str>) {
        // Send errors mean no subscribers, which is fine.
        let _ = self.sender.send(RunEvent::ProbeCompleted {
            index,
            total,
            verdict: verdict.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_exact() {
        assert_eq!(fraction(0, 8), 0.0);
        assert_eq!(fraction(4, 8), 0.5);
        assert_eq!(fraction(8, 8), 1.0);
    }

    #[test]
    fn fraction_of_empty_registry_is_zero() {
        assert_eq!(fraction(0, 0), 0.0);
    }

    #[tokio::test]
    async fn channel_reporter_forwards_verdicts() {
        let (tx, mut rx) = broadcast::channel(8);
        let reporter = ChannelReporter::new(tx);
        let verdict = Verdict::pass("Bluetooth", "Bluetooth access granted");
        reporter.report(2, 5, &verdict, Some("Sound Test"));

        match rx.recv().await.unwrap() {
            RunEvent::ProbeCompleted {
                index,
                total,
                verdict,
            } => {
                assert_eq!(index, 2);
                assert_eq!(total, 5);
                assert!(verdict.success);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
