//! Geolocation permission check.

use crate::core::{Probe, Verdict};
use crate::platform::Geolocation;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

const PROBE_NAME: &str = "Geolocation";

/// Requests one position fix to establish that positioning works and the
/// user grants access. Denial is a failing verdict, not a run error.
pub struct GeolocationProbe {
    geolocation: Arc<dyn Geolocation>,
}

impl GeolocationProbe {
    /// Creates the probe.
    pub fn new(geolocation: Arc<dyn Geolocation>) -> Self {
        Self { geolocation }
    }
}

#[async_trait]
impl Probe for GeolocationProbe {
    fn name(&self) -> String {
        PROBE_NAME.to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        if !self.geolocation.supported() {
            return Ok(Verdict::fail(PROBE_NAME, "Geolocation not supported"));
        }
        match self.geolocation.current_position().await {
            Ok(position) => {
                log::debug!(
                    "Geolocation fix: {:.4}, {:.4} (accuracy {} m)",
                    position.latitude,
                    position.longitude,
                    position.accuracy_m
                );
                Ok(Verdict::pass(PROBE_NAME, "Geolocation access granted"))
            }
            Err(err) => {
                log::debug!("Geolocation request failed: {:#}", err);
                Ok(Verdict::fail(PROBE_NAME, "Geolocation access denied"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPlatform, PermissionMode};

    #[tokio::test]
    async fn granted_position_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let verdict = GeolocationProbe::new(platform).execute().await.unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.details, "Geolocation access granted");
    }

    #[tokio::test]
    async fn denied_position_fails() {
        let platform =
            Arc::new(MockPlatform::agreeable().with_geolocation(PermissionMode::Denied));
        let verdict = GeolocationProbe::new(platform).execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Geolocation access denied");
    }

    #[tokio::test]
    async fn unsupported_service_fails() {
        let platform =
            Arc::new(MockPlatform::agreeable().with_geolocation(PermissionMode::Unsupported));
        let verdict = GeolocationProbe::new(platform).execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Geolocation not supported");
    }
}
