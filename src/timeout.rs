//! Deadline enforcement for probe execution.
//!
//! Human-confirmation probes may never resolve if the user abandons the
//! device, so every probe execution is raced against a wall-clock deadline.
//! The guard converts the three possible outcomes (resolution, rejection,
//! expiry) into a [`Verdict`]; nothing in this module can abort the run loop.

use crate::core::{Probe, Verdict};
use std::time::Duration;
use tokio::time::timeout;

/// Default per-probe deadline.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Races a probe's completion against a fixed deadline.
#[derive(Clone, Copy, Debug)]
pub struct TimeoutGuard {
    deadline: Duration,
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(DEFAULT_DEADLINE)
    }
}

impl TimeoutGuard {
    /// Creates a guard with the given per-probe deadline.
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// The configured deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs a probe to a verdict, whatever happens.
    ///
    /// - Resolution before the deadline returns the probe's verdict unchanged.
    /// - Rejection before the deadline becomes a failing verdict carrying the
    ///   error's message, under the probe's declared name.
    /// - Expiry becomes a failing verdict with a "timed out after N seconds"
    ///   detail. The probe's future is dropped at that point, which cancels
    ///   any timers or pending resolution it held; a stale outcome cannot
    ///   fire afterwards.
    pub async fn run(&self, probe: &dyn Probe) -> Verdict {
        let name = probe.name();
        match timeout(self.deadline, probe.execute()).await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(err)) => {
                log::warn!("Probe '{}' rejected: {:#}", name, err);
                Verdict::fail(name, format!("{:#}", err))
            }
            Err(_) => {
                log::warn!(
                    "Probe '{}' timed out after {} seconds",
                    name,
                    self.deadline.as_secs()
                );
                Verdict::fail(
                    name,
                    format!("timed out after {} seconds", self.deadline.as_secs()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::future;

    struct InstantPass;

    #[async_trait]
    impl Probe for InstantPass {
        fn name(&self) -> String {
            "Instant".to_string()
        }

        async fn execute(&self) -> anyhow::Result<Verdict> {
            Ok(Verdict::pass("Instant", "done"))
        }
    }

    struct Rejecting;

    #[async_trait]
    impl Probe for Rejecting {
        fn name(&self) -> String {
            "Rejecting".to_string()
        }

        async fn execute(&self) -> anyhow::Result<Verdict> {
            Err(anyhow!("denied"))
        }
    }

    struct NeverResolves;

    #[async_trait]
    impl Probe for NeverResolves {
        fn name(&self) -> String {
            "Stuck".to_string()
        }

        async fn execute(&self) -> anyhow::Result<Verdict> {
            future::pending().await
        }
    }

    #[tokio::test]
    async fn passes_verdict_through_unchanged() {
        let guard = TimeoutGuard::new(Duration::from_secs(5));
        let verdict = guard.run(&InstantPass).await;
        assert!(verdict.success);
        assert_eq!(verdict.details, "done");
    }

    #[tokio::test]
    async fn rejection_becomes_failing_verdict() {
        let guard = TimeoutGuard::new(Duration::from_secs(5));
        let verdict = guard.run(&Rejecting).await;
        assert!(!verdict.success);
        assert_eq!(verdict.name, "Rejecting");
        assert_eq!(verdict.details, "denied");
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_becomes_timed_out_verdict() {
        let guard = TimeoutGuard::new(Duration::from_secs(30));
        let verdict = guard.run(&NeverResolves).await;
        assert!(!verdict.success);
        assert_eq!(verdict.name, "Stuck");
        assert!(verdict.details.contains("timed out"));
        assert_eq!(verdict.details, "timed out after 30 seconds");
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_takes_exactly_the_deadline() {
        let guard = TimeoutGuard::new(Duration::from_secs(2));
        let before = tokio::time::Instant::now();
        let _ = guard.run(&NeverResolves).await;
        assert_eq!(before.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stays_pending_until_the_deadline() {
        let guard = TimeoutGuard::new(Duration::from_secs(2));
        let probe = NeverResolves;
        let mut run = tokio_test::task::spawn(guard.run(&probe));

        tokio_test::assert_pending!(run.poll());
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio_test::assert_pending!(run.poll());

        tokio::time::advance(Duration::from_secs(1)).await;
        let verdict = tokio_test::assert_ready!(run.poll());
        assert!(!verdict.success);
        assert_eq!(verdict.details, "timed out after 2 seconds");
    }
}
