//! Camera capture checks.

use crate::core::{Probe, Verdict};
use crate::platform::{Camera, CameraFacing, UserPrompt};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Captures one frame from a camera and asks whether it looks correct.
///
/// Front and rear cameras are separate registry entries so a broken module
/// on one side shows up on its own row.
pub struct CameraProbe {
    facing: CameraFacing,
    camera: Arc<dyn Camera>,
    prompt: Arc<dyn UserPrompt>,
}

impl CameraProbe {
    /// Creates a probe for the given camera.
    pub fn new(facing: CameraFacing, camera: Arc<dyn Camera>, prompt: Arc<dyn UserPrompt>) -> Self {
        Self {
            facing,
            camera,
            prompt,
        }
    }
}

#[async_trait]
impl Probe for CameraProbe {
    fn name(&self) -> String {
        format!("{} Camera Test", self.facing.name())
    }

    async fn execute(&self) -> Result<Verdict> {
        let name = self.name();
        let photo = match self.camera.capture(self.facing).await {
            Ok(photo) => photo,
            Err(err) => {
                return Ok(Verdict::fail(
                    name,
                    format!(
                        "Failed to access {} camera: {:#}",
                        self.facing.name().to_lowercase(),
                        err
                    ),
                ));
            }
        };

        let confirmed = self
            .prompt
            .confirm(&format!(
                "A {}x{} photo was captured with the {} camera. Does it look correct?",
                photo.width,
                photo.height,
                self.facing.name().to_lowercase()
            ))
            .await?;

        Ok(if confirmed {
            Verdict::pass(name, "Photo capture: Successful")
        } else {
            Verdict::fail(name, "Photo capture: Failed")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPlatform, PermissionMode};

    #[tokio::test]
    async fn confirmed_capture_passes() {
        let platform = Arc::new(MockPlatform::agreeable());
        let probe = CameraProbe::new(CameraFacing::Front, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.name, "Front Camera Test");
        assert_eq!(verdict.details, "Photo capture: Successful");
    }

    #[tokio::test]
    async fn denied_camera_fails_with_the_error_message() {
        let platform = Arc::new(MockPlatform::agreeable().with_camera(PermissionMode::Denied));
        let probe = CameraProbe::new(CameraFacing::Rear, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert!(verdict.details.starts_with("Failed to access rear camera"));
        assert!(verdict.details.contains("denied"));
    }

    #[tokio::test]
    async fn rejected_photo_fails() {
        let platform = Arc::new(MockPlatform::agreeable().with_default_confirmation(false));
        let probe = CameraProbe::new(CameraFacing::Rear, platform.clone(), platform);
        let verdict = probe.execute().await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.details, "Photo capture: Failed");
    }
}
