//! Display checks: reported resolution and per-color defect inspection.

use crate::core::{Probe, Verdict};
use crate::platform::{Display, ScreenColor, UserPrompt};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Sanity check on the reported native resolution.
pub struct ResolutionProbe {
    display: Arc<dyn Display>,
}

impl ResolutionProbe {
    /// Creates the probe.
    pub fn new(display: Arc<dyn Display>) -> Self {
        Self { display }
    }
}

#[async_trait]
impl Probe for ResolutionProbe {
    fn name(&self) -> String {
        "Screen Resolution".to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        let (width, height) = self.display.resolution();
        let details = format!("Resolution: {}x{}", width, height);
        Ok(if width > 0 && height > 0 {
            Verdict::pass(self.name(), details)
        } else {
            Verdict::fail(self.name(), details)
        })
    }
}

/// Fills the screen with each test color in turn and asks the user to
/// confirm the panel is uniform. Failed colors are listed in the details.
pub struct ColorScreenProbe {
    display: Arc<dyn Display>,
    prompt: Arc<dyn UserPrompt>,
}

impl ColorScreenProbe {
    /// Creates the probe.
    pub fn new(display: Arc<dyn Display>, prompt: Arc<dyn UserPrompt>) -> Self {
        Self { display, prompt }
    }
}

#[async_trait]
impl Probe for ColorScreenProbe {
    fn name(&self) -> String {
        "Color Screen Test".to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        let mut failed_colors: Vec<&'static str> = Vec::new();
        for color in ScreenColor::cycle() {
            self.display.fill(color).await?;
            let uniform = self
                .prompt
                .confirm(&format!(
                    "The screen is filled with {}. Is it free of defects?",
                    color.name().to_lowercase()
                ))
                .await?;
            if !uniform {
                failed_colors.push(color.name());
            }
        }

        Ok(if failed_colors.is_empty() {
            Verdict::pass(self.name(), "All color screens tested successfully")
        } else {
            Verdict::fail(
                self.name(),
                format!("Defects found in: {} screen(s)", failed_colors.join(", ")),
            )
        })
    }
}
