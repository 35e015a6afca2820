use log::debug;

use crate::agent_config::AgentConfig;
use crate::avatar::{AvatarPose, ScenePoint2D};
use crate::error::{Error, Result};
use crate::geometry_utils::centroid;
use crate::landmarks::{self, NormalizedLandmark, LandmarkRoleMap};
use crate::orientation::compute_tilt_angle;
use crate::projection::CameraFrustum;

/// Converts one face's normalized landmarks into an avatar pose: eye
/// positions and head centre on the z=0 plane plus a head-tilt orientation
/// sample. Stateless apart from the current camera frustum; every call is a
/// pure function of its inputs.
pub struct AvatarMapper {
    frustum: CameraFrustum,
    roles: LandmarkRoleMap,
}

impl AvatarMapper {
    pub fn new(config: &AgentConfig) -> Result<AvatarMapper> {
        Ok(AvatarMapper {
            frustum: config.frustum()?,
            roles: config.landmark_roles.clone(),
        })
    }

    pub fn frustum(&self) -> &CameraFrustum {
        &self.frustum
    }

    /// Apply a viewport-resize notification; the new aspect ratio is visible
    /// to the very next mapping call
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<()> {
        self.frustum.set_viewport(width, height)
    }

    /// Replace frustum and role table after a remote config update
    pub fn update_from_config(&mut self, config: &AgentConfig) -> Result<()> {
        self.frustum = config.frustum()?;
        self.roles = config.landmark_roles.clone();
        Ok(())
    }

    pub fn map_face(&self, face: &[NormalizedLandmark]) -> Result<AvatarPose> {
        let left_eye = self.map_role(face, landmarks::LEFT_EYE)?;
        let right_eye = self.map_role(face, landmarks::RIGHT_EYE)?;

        let head_centre = centroid(&[(left_eye.x, left_eye.y), (right_eye.x, right_eye.y)])
            .map(|(x, y)| ScenePoint2D::new(x, y))
            .ok_or_else(|| Error::MissingInput(String::from("no eye positions to centre")))?;

        let top = self.map_role(face, landmarks::FOREHEAD_TOP)?;
        let bottom = self.map_role(face, landmarks::CHIN_BOTTOM)?;

        // A degenerate forehead/chin pair only suppresses the orientation
        // update for this frame; the positional mapping stands
        let orientation = match compute_tilt_angle(top, bottom) {
            Ok(sample) => Some(sample),
            Err(Error::DegenerateInput(reason)) => {
                debug!("Skipping orientation update: {}", reason);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(AvatarPose {
            left_eye,
            right_eye,
            head_centre,
            orientation,
        })
    }

    fn map_role(&self, face: &[NormalizedLandmark], role: &str) -> Result<ScenePoint2D> {
        let landmark = landmarks::landmark_for_role(face, &self.roles, role)?;
        self.frustum.map_to_scene(landmark)
    }
}
