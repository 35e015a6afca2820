use serde::{Deserialize, Serialize};

use crate::orientation::OrientationSample;

/// A position in scene units on the z=0 plane: origin at the centre of the
/// visible area, y increasing upwards
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScenePoint2D {
    pub x: f32,
    pub y: f32,
}

impl ScenePoint2D {
    pub fn new(x: f32, y: f32) -> Self {
        ScenePoint2D { x, y }
    }
}

/// Everything the (external) renderer needs to position and rotate the avatar
/// for one frame. Orientation is omitted when the reference points were
/// coincident; the eye positions are still valid in that case.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPose {
    pub left_eye: ScenePoint2D,
    pub right_eye: ScenePoint2D,
    pub head_centre: ScenePoint2D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<OrientationSample>,
}
