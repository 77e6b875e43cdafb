//! Touch digitizer dead-zone check.
//!
//! The screen is divided into a grid of cells; the user sweeps a finger
//! across it and every contact marks the cell it lands in. The check
//! succeeds as soon as the configured fraction of cells has been touched
//! and gives up after a sampling window, reporting the achieved coverage
//! either way.

use crate::core::{Probe, Verdict};
use crate::platform::{TouchPoint, TouchSurface};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

const PROBE_NAME: &str = "Touch Tracking";

/// Grid coverage check over a stream of touch contacts.
pub struct TouchProbe {
    rows: usize,
    cols: usize,
    min_coverage: f64,
    window: Duration,
    surface: Arc<dyn TouchSurface>,
}

impl TouchProbe {
    /// Creates a probe over a `rows` x `cols` grid requiring `min_coverage`
    /// (a fraction in (0, 1]) within `window`.
    pub fn new(
        rows: usize,
        cols: usize,
        min_coverage: f64,
        window: Duration,
        surface: Arc<dyn TouchSurface>,
    ) -> Self {
        Self {
            rows,
            cols,
            min_coverage,
            window,
            surface,
        }
    }

    fn cell_index(&self, point: TouchPoint) -> Option<usize> {
        if !(0.0..=1.0).contains(&point.x) || !(0.0..=1.0).contains(&point.y) {
            return None;
        }
        let col = ((point.x * self.cols as f64) as usize).min(self.cols - 1);
        let row = ((point.y * self.rows as f64) as usize).min(self.rows - 1);
        Some(row * self.cols + col)
    }
}

#[async_trait]
impl Probe for TouchProbe {
    fn name(&self) -> String {
        PROBE_NAME.to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        let mut stream = self.surface.touch_stream().await?;
        let total = self.rows * self.cols;
        let mut touched = vec![false; total];
        let mut touched_count = 0usize;

        let window = tokio::time::sleep(self.window);
        tokio::pin!(window);

        let ended_early = loop {
            let coverage = touched_count as f64 / total as f64;
            if coverage >= self.min_coverage {
                return Ok(Verdict::pass(
                    PROBE_NAME,
                    format!(
                        "Touch tracking completed with {:.1}% coverage",
                        coverage * 100.0
                    ),
                ));
            }

            tokio::select! {
                _ = &mut window => break false,
                event = stream.recv() => match event {
                    Ok(point) => {
                        if let Some(index) = self.cell_index(point) {
                            if !touched[index] {
                                touched[index] = true;
                                touched_count += 1;
                            }
                        }
                    }
                    // Missed contacts only slow the sweep down.
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break true,
                },
            }
        };

        let percent = touched_count as f64 / total as f64 * 100.0;
        let details = if ended_early {
            format!("Touch input ended with {:.1}% coverage", percent)
        } else {
            format!("Touch tracking timed out with {:.1}% coverage", percent)
        };
        Ok(Verdict::fail(PROBE_NAME, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{touch_grid_sweep, MockPlatform};

    fn probe_on(platform: Arc<MockPlatform>, min_coverage: f64) -> TouchProbe {
        TouchProbe::new(16, 8, min_coverage, Duration::from_secs(20), platform)
    }

    #[tokio::test]
    async fn full_sweep_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let verdict = probe_on(platform, 0.85).execute().await.unwrap();
        assert!(verdict.success);
        assert!(verdict.details.contains("100.0% coverage"));
    }

    #[tokio::test]
    async fn partial_sweep_fails_when_stream_ends() {
        let platform = Arc::new(
            MockPlatform::agreeable().with_touch_script(touch_grid_sweep(16, 8, 0.5)),
        );
        let verdict = probe_on(platform, 0.85).execute().await.unwrap();
        assert!(!verdict.success);
        assert!(verdict.details.contains("50.0% coverage"));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_surface_times_out_with_zero_coverage() {
        // An empty script closes the stream immediately, so keep the sender
        // alive to exercise the window path instead.
        struct SilentSurface {
            _keepalive: tokio::sync::broadcast::Sender<TouchPoint>,
            receiver_source: tokio::sync::broadcast::Sender<TouchPoint>,
        }

        #[async_trait]
        impl TouchSurface for SilentSurface {
            async fn touch_stream(
                &self,
            ) -> Result<tokio::sync::broadcast::Receiver<TouchPoint>> {
                Ok(self.receiver_source.subscribe())
            }
        }

        let (sender, _receiver) = tokio::sync::broadcast::channel(4);
        let surface = Arc::new(SilentSurface {
            _keepalive: sender.clone(),
            receiver_source: sender,
        });
        let probe = TouchProbe::new(16, 8, 0.85, Duration::from_secs(20), surface);
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert!(verdict.details.contains("timed out"));
        assert!(verdict.details.contains("0.0% coverage"));
    }

    #[test]
    fn contacts_outside_the_surface_are_ignored() {
        let platform = Arc::new(MockPlatform::agreeable());
        let probe = probe_on(platform, 1.0);
        assert_eq!(probe.cell_index(TouchPoint { x: 1.5, y: 0.5 }), None);
        assert_eq!(probe.cell_index(TouchPoint { x: -0.1, y: 0.5 }), None);
        assert_eq!(probe.cell_index(TouchPoint { x: 0.0, y: 0.0 }), Some(0));
        assert_eq!(probe.cell_index(TouchPoint { x: 1.0, y: 1.0 }), Some(127));
    }
}
