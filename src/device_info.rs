//! Device information snapshot shown above the test report.

use crate::platform::Display;
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Static facts about the device under test.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Machine hostname.
    pub hostname: String,
    /// Operating system name.
    pub os: String,
    /// Operating system version.
    pub os_version: String,
    /// Kernel version.
    pub kernel: String,
    /// CPU brand string.
    pub cpu: String,
    /// Total memory in mebibytes.
    pub total_memory_mib: u64,
    /// Display resolution, if a display capability is attached.
    pub resolution: Option<(u32, u32)>,
}

impl DeviceInfo {
    /// Collects a snapshot from the running system.
    pub fn collect(display: Option<&dyn Display>) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            hostname,
            os: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            cpu: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            total_memory_mib: sys.total_memory() / (1024 * 1024),
            resolution: display.map(|d| d.resolution()),
        }
    }

    /// Label/value rows for rendering.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Hostname", self.hostname.clone()),
            ("OS", format!("{} {}", self.os, self.os_version)),
            ("Kernel", self.kernel.clone()),
            ("CPU", self.cpu.clone()),
            ("Memory", format!("{} MiB", self.total_memory_mib)),
        ];
        if let Some((width, height)) = self.resolution {
            rows.push(("Screen Resolution", format!("{}x{}", width, height)));
        }
        rows
    }
}
