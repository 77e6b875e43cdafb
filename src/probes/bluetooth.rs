//! Bluetooth adapter check.

use crate::core::{Probe, Verdict};
use crate::platform::Bluetooth;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

const PROBE_NAME: &str = "Bluetooth";

/// Capability presence check; no pairing or scanning is attempted.
pub struct BluetoothProbe {
    bluetooth: Arc<dyn Bluetooth>,
}

impl BluetoothProbe {
    /// Creates the probe.
    pub fn new(bluetooth: Arc<dyn Bluetooth>) -> Self {
        Self { bluetooth }
    }
}

#[async_trait]
impl Probe for BluetoothProbe {
    fn name(&self) -> String {
        PROBE_NAME.to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        Ok(if self.bluetooth.available() {
            Verdict::pass(PROBE_NAME, "Bluetooth access granted")
        } else {
            Verdict::fail(PROBE_NAME, "Bluetooth not supported")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    #[tokio::test]
    async fn present_adapter_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let verdict = BluetoothProbe::new(platform).execute().await.unwrap();
        assert!(verdict.success);
    }

    #[tokio::test]
    async fn missing_adapter_fails() {
        let platform = Arc::new(MockPlatform::agreeable().without_bluetooth());
        let verdict = BluetoothProbe::new(platform).execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Bluetooth not supported");
    }
}
