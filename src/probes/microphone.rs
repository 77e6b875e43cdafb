//! Microphone record-and-playback check.

use crate::core::{Probe, Verdict};
use crate::platform::{AudioOutput, Microphone, UserPrompt};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const PROBE_NAME: &str = "Microphone Test";

/// Records a short clip, plays it back, and asks whether it sounded right.
///
/// The capture stream is acquired and released inside `execute`; a denied
/// or absent microphone is a failing verdict, not a run error.
pub struct MicrophoneProbe {
    recording_duration: Duration,
    microphone: Arc<dyn Microphone>,
    audio: Arc<dyn AudioOutput>,
    prompt: Arc<dyn UserPrompt>,
}

impl MicrophoneProbe {
    /// Creates a probe recording a clip of the given length.
    pub fn new(
        recording_duration: Duration,
        microphone: Arc<dyn Microphone>,
        audio: Arc<dyn AudioOutput>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Self {
        Self {
            recording_duration,
            microphone,
            audio,
            prompt,
        }
    }
}

#[async_trait]
impl Probe for MicrophoneProbe {
    fn name(&self) -> String {
        PROBE_NAME.to_string()
    }

    async fn execute(&self) -> Result<Verdict> {
        let recording = match self.microphone.record(self.recording_duration).await {
            Ok(recording) => recording,
            Err(err) => {
                log::warn!("Microphone capture failed: {:#}", err);
                return Ok(Verdict::fail(
                    PROBE_NAME,
                    "Microphone access denied or not available",
                ));
            }
        };

        self.audio.play_recording(&recording).await?;
        let confirmed = self
            .prompt
            .confirm("Your recording was played back. Did it sound correct?")
            .await?;

        Ok(if confirmed {
            Verdict::pass(PROBE_NAME, "Recording and playback successful")
        } else {
            Verdict::fail(PROBE_NAME, "Recording or playback failed")
        })
    }
}
