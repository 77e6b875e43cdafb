//! Orientation sensor sweep check.
//!
//! Orientation readings are bucketed into 10-degree segments over the full
//! 360x180 degree range (648 segments). The user tilts the device until the
//! configured fraction of segments has been visited. The upper time bound
//! comes from the orchestrator's deadline; the probe itself runs until the
//! target is reached or the sensor stream ends.

use crate::core::{Probe, Verdict};
use crate::platform::{OrientationSample, OrientationSensor};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

const PROBE_NAME: &str = "Gyroscope Test";

const ALPHA_BINS: usize = 36;
const BETA_BINS: usize = 18;
const TOTAL_SEGMENTS: usize = ALPHA_BINS * BETA_BINS;
const SEGMENT_DEGREES: f64 = 10.0;

/// Angle-coverage check over a stream of orientation readings.
pub struct OrientationProbe {
    min_coverage: f64,
    sensor: Arc<dyn OrientationSensor>,
}

impl OrientationProbe {
    /// Creates a probe requiring `min_coverage` (a fraction in (0, 1]) of
    /// the 648 angle segments.
    pub fn new(min_coverage: f64, sensor: Arc<dyn OrientationSensor>) -> Self {
        Self {
            min_coverage,
            sensor,
        }
    }

    fn segment(sample: OrientationSample) -> (usize, usize) {
        let alpha = sample.alpha.rem_euclid(360.0);
        // Fold the tilt into [0, 180] so front and back tilt of the same
        // magnitude land in the same segment row.
        let beta = {
            let b = sample.beta.rem_euclid(360.0);
            if b > 180.0 {
                360.0 - b
            } else {
                b
            }
        };
        let alpha_bin = ((alpha / SEGMENT_DEGREES) as usize).min(ALPHA_BINS - 1);
        let beta_bin = ((beta / SEGMENT_DEGREES) as usize).min(BETA_BINS - 1);
        (alpha_bin, beta_bin)
    }
}

#[async_trait]
impl Probe for OrientationProbe {
    fn name(&self) -> String {
        PROBE_NAME.to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        if !self.sensor.supported() {
            return Ok(Verdict::fail(PROBE_NAME, "Device orientation not supported"));
        }

        let mut stream = self.sensor.orientation_stream().await?;
        let mut visited: HashSet<(usize, usize)> = HashSet::new();

        loop {
            let coverage = visited.len() as f64 / TOTAL_SEGMENTS as f64;
            if coverage >= self.min_coverage {
                return Ok(Verdict::pass(
                    PROBE_NAME,
                    format!(
                        "Gyroscope calibrated successfully with {}% coverage",
                        (coverage * 100.0).round()
                    ),
                ));
            }

            match stream.recv().await {
                Ok(sample) => {
                    visited.insert(Self::segment(sample));
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => {
                    return Ok(Verdict::fail(
                        PROBE_NAME,
                        format!(
                            "Orientation sweep ended with {}% coverage",
                            (coverage * 100.0).round()
                        ),
                    ));
                }
            }
        }
    }
}
