use log::{debug, warn};
use tether_agent::{PlugDefinition, PlugOptionsBuilder, TetherAgent};

use crate::agent_config::AgentConfig;
use crate::error::Error;
use crate::landmarks::FaceFrame;
use crate::systems::Systems;
use crate::Point2D;

pub struct Outputs {
    pub config_output: PlugDefinition,
    pub pose_output: PlugDefinition,
    pub samples_output: PlugDefinition,
}

impl Outputs {
    pub fn new(tether_agent: &mut TetherAgent) -> Outputs {
        let config_output = PlugOptionsBuilder::create_output("provideAvatarConfig")
            .qos(Some(2))
            .retain(Some(true))
            .build(tether_agent)
            .expect("failed to create Output Plug");

        // Per-frame avatar pose for the renderer
        let pose_output = PlugOptionsBuilder::create_output("avatarPose")
            .qos(Some(0))
            .build(tether_agent)
            .expect("failed to create Output Plug");

        // Periodic batched samples for the (external) data sink
        let samples_output = PlugOptionsBuilder::create_output("poseSamples")
            .qos(Some(1))
            .build(tether_agent)
            .expect("failed to create Output Plug");

        Outputs {
            config_output,
            pose_output,
            samples_output,
        }
    }
}

pub struct Inputs {
    pub landmarks_input: PlugDefinition,
    pub viewport_input: PlugDefinition,
    pub save_config_input: PlugDefinition,
    pub request_config_input: PlugDefinition,
}

impl Inputs {
    pub fn new(tether_agent: &mut TetherAgent) -> Inputs {
        // Some subscriptions
        let landmarks_input = PlugOptionsBuilder::create_input("faceLandmarks")
            .qos(Some(0))
            .build(tether_agent)
            .expect("failed to create Input Plug");
        let viewport_input = PlugOptionsBuilder::create_input("viewportSize")
            .qos(Some(1))
            .build(tether_agent)
            .expect("failed to create Input Plug");
        let save_config_input = PlugOptionsBuilder::create_input("saveAvatarConfig")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Plug");
        let request_config_input = PlugOptionsBuilder::create_input("requestAvatarConfig")
            .qos(Some(2))
            .build(tether_agent)
            .expect("failed to create Input Plug");

        Inputs {
            landmarks_input,
            viewport_input,
            save_config_input,
            request_config_input,
        }
    }
}

/// Map the first detected face of the frame and pass the result on: publish
/// for the renderer if enabled, buffer for recording if enabled. Mapper
/// failures are per-frame conditions; log and move on.
pub fn handle_landmarks_message(
    frame: &FaceFrame,
    config: &AgentConfig,
    tether_agent: &TetherAgent,
    systems: &mut Systems,
    outputs: &Outputs,
) {
    let Systems { mapper, recorder } = systems;

    let Some(face) = frame.first() else {
        debug!("No face in this frame; nothing to map");
        return;
    };

    match mapper.map_face(face) {
        Ok(pose) => {
            if config.show_avatar {
                tether_agent
                    .encode_and_publish(&outputs.pose_output, &pose)
                    .expect("failed to publish avatar pose");
            }
            if config.collect_data {
                recorder.record(&pose);
            }
        }
        Err(Error::MissingInput(reason)) => {
            debug!("Skipping frame: {}", reason);
        }
        Err(e) => {
            warn!("Failed to map face landmarks: {}", e);
        }
    }
}

/// Viewport resize notification: update the frustum aspect ratio before the
/// next mapping call. An invalid size is ignored, keeping the previous aspect.
pub fn handle_viewport_message(size: Point2D, systems: &mut Systems) {
    let (width, height) = size;
    match systems.mapper.set_viewport(width, height) {
        Ok(()) => {
            debug!(
                "Viewport resized to {}x{}; aspect ratio now {}",
                width,
                height,
                systems.mapper.frustum().aspect_ratio
            );
        }
        Err(e) => {
            warn!("Ignoring viewport resize: {}", e);
        }
    }
}
