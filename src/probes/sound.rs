//! Speaker frequency-band checks.

use crate::core::{Probe, Verdict};
use crate::platform::{AudioOutput, UserPrompt};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Frequency bands tested one probe at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrequencyBand {
    /// 200 Hz, near the lower edge of small speakers.
    Low,
    /// 1000 Hz reference tone.
    Mid,
    /// 4000 Hz, where aging speakers roll off.
    High,
}

impl FrequencyBand {
    /// Display label used in names and details.
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyBand::Low => "Low Frequency",
            FrequencyBand::Mid => "Mid Frequency",
            FrequencyBand::High => "High Frequency",
        }
    }

    /// Tone frequency for this band.
    pub fn frequency_hz(&self) -> f64 {
        match self {
            FrequencyBand::Low => 200.0,
            FrequencyBand::Mid => 1000.0,
            FrequencyBand::High => 4000.0,
        }
    }
}

/// Plays a tone in one band and asks whether it was heard.
pub struct SoundProbe {
    band: FrequencyBand,
    tone_duration: Duration,
    audio: Arc<dyn AudioOutput>,
    prompt: Arc<dyn UserPrompt>,
}

impl SoundProbe {
    /// Creates a probe for the given band.
    pub fn new(
        band: FrequencyBand,
        tone_duration: Duration,
        audio: Arc<dyn AudioOutput>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Self {
        Self {
            band,
            tone_duration,
            audio,
            prompt,
        }
    }
}

#[async_trait]
impl Probe for SoundProbe {
    fn name(&self) -> String {
        format!("{} Sound Test", self.band.label())
    }

    async fn execute(&self) -> Result<Verdict> {
        self.audio
            .play_tone(self.band.frequency_hz(), self.tone_duration)
            .await?;
        let heard = self
            .prompt
            .confirm(&format!(
                "A {} sound was played. Did you hear it?",
                self.band.label().to_lowercase()
            ))
            .await?;

        let details = format!(
            "{}: {}",
            self.band.label(),
            if heard { "Heard" } else { "Not heard" }
        );
        Ok(if heard {
            Verdict::pass(self.name(), details)
        } else {
            Verdict::fail(self.name(), details)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    #[tokio::test]
    async fn heard_tone_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let probe = SoundProbe::new(
            FrequencyBand::Mid,
            Duration::from_secs(1),
            platform.clone(),
            platform,
        );
        let verdict = probe.execute().await.unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.name, "Mid Frequency Sound Test");
        assert_eq!(verdict.details, "Mid Frequency: Heard");
    }

    #[tokio::test]
    async fn unheard_tone_fails() {
        let platform = Arc::new(MockPlatform::agreeable().with_default_confirmation(false));
        let probe = SoundProbe::new(
            FrequencyBand::High,
            Duration::from_secs(1),
            platform.clone(),
            platform,
        );
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "High Frequency: Not heard");
    }

    #[test]
    fn band_frequencies() {
        assert_eq!(FrequencyBand::Low.frequency_hz(), 200.0);
        assert_eq!(FrequencyBand::Mid.frequency_hz(), 1000.0);
        assert_eq!(FrequencyBand::High.frequency_hz(), 4000.0);
    }
}
