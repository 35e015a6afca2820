use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::avatar::{AvatarPose, ScenePoint2D};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PoseSample {
    pub timestamp_ms: u64,
    pub left_eye: ScenePoint2D,
    pub right_eye: ScenePoint2D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt_angle_radians: Option<f32>,
}

/// Buffers timestamped pose samples between periodic batch sends. Delivery is
/// at-most-once: draining clears the buffer whether or not the subsequent
/// publish succeeds.
pub struct SampleRecorder {
    samples: Vec<PoseSample>,
    last_sent: SystemTime,
}

impl SampleRecorder {
    pub fn new() -> Self {
        SampleRecorder {
            samples: Vec::new(),
            last_sent: SystemTime::now(),
        }
    }

    pub fn record(&mut self, pose: &AvatarPose) {
        self.samples.push(PoseSample {
            timestamp_ms: now_ms(),
            left_eye: pose.left_eye,
            right_eye: pose.right_eye,
            tilt_angle_radians: pose.orientation.as_ref().map(|o| o.tilt_angle_radians),
        });
    }

    pub fn get_elapsed(&self) -> Duration {
        self.last_sent.elapsed().unwrap_or_default()
    }

    pub fn reset_timer(&mut self) {
        self.last_sent = SystemTime::now();
    }

    pub fn drain(&mut self) -> Vec<PoseSample> {
        std::mem::take(&mut self.samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SampleRecorder {
    fn default() -> Self {
        SampleRecorder::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
