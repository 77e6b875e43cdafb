//! Vibration motor checks.

use crate::core::{Probe, Verdict};
use crate::platform::{Haptics, UserPrompt};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Pattern strength variants, each its own registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VibrationStrength {
    /// Single 200 ms pulse.
    Short,
    /// Single 500 ms pulse.
    Medium,
    /// Single 1000 ms pulse.
    Long,
}

impl VibrationStrength {
    /// Display label used in names and details.
    pub fn label(&self) -> &'static str {
        match self {
            VibrationStrength::Short => "Short Vibration",
            VibrationStrength::Medium => "Medium Vibration",
            VibrationStrength::Long => "Long Vibration",
        }
    }

    /// Motor on-durations for this strength.
    pub fn pattern(&self) -> Vec<Duration> {
        match self {
            VibrationStrength::Short => vec![Duration::from_millis(200)],
            VibrationStrength::Medium => vec![Duration::from_millis(500)],
            VibrationStrength::Long => vec![Duration::from_millis(1000)],
        }
    }
}

/// Plays one vibration pattern and asks whether it was felt.
pub struct VibrationProbe {
    strength: VibrationStrength,
    haptics: Arc<dyn Haptics>,
    prompt: Arc<dyn UserPrompt>,
}

impl VibrationProbe {
    /// Creates a probe for the given pattern strength.
    pub fn new(
        strength: VibrationStrength,
        haptics: Arc<dyn Haptics>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Self {
        Self {
            strength,
            haptics,
            prompt,
        }
    }
}

#[async_trait]
impl Probe for VibrationProbe {
    fn name(&self) -> String {
        format!("{} Test", self.strength.label())
    }

    async fn execute(&self) -> Result<Verdict> {
        let name = self.name();
        if !self.haptics.supported() {
            return Ok(Verdict::fail(name, "Vibration not supported"));
        }

        self.haptics.vibrate(&self.strength.pattern()).await?;
        let felt = self
            .prompt
            .confirm(&format!(
                "A {} vibration was played. Did you feel it?",
                self.strength.label().to_lowercase()
            ))
            .await?;

        let details = format!(
            "{}: {}",
            self.strength.label(),
            if felt { "Felt" } else { "Not felt" }
        );
        Ok(if felt {
            Verdict::pass(name, details)
        } else {
            Verdict::fail(name, details)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    #[tokio::test]
    async fn felt_vibration_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let probe = VibrationProbe::new(VibrationStrength::Short, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.name, "Short Vibration Test");
        assert_eq!(verdict.details, "Short Vibration: Felt");
    }

    #[tokio::test]
    async fn unfelt_vibration_fails() {
        let platform = Arc::new(MockPlatform::agreeable().with_default_confirmation(false));
        let probe = VibrationProbe::new(VibrationStrength::Long, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Long Vibration: Not felt");
    }

    #[tokio::test]
    async fn missing_motor_fails_without_prompting() {
        let platform = Arc::new(MockPlatform::agreeable().without_haptics());
        let probe = VibrationProbe::new(VibrationStrength::Medium, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Vibration not supported");
    }
}
