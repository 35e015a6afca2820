use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Semantic role names used throughout the mapping pipeline. The detector index
// behind each role is a contract with the external model and lives in config,
// not in the computation code.
pub const LEFT_EYE: &str = "leftEye";
pub const RIGHT_EYE: &str = "rightEye";
pub const FOREHEAD_TOP: &str = "foreheadTop";
pub const CHIN_BOTTOM: &str = "chinBottom";
pub const LEFT_TEMPLE: &str = "leftTemple";
pub const RIGHT_TEMPLE: &str = "rightTemple";

/// Default indices as per the MediaPipe FaceLandmarker model: iris centres
/// (468/473), the vertical face axis (10/152) and the temples (234/454)
const DEFAULT_ROLES: [(&str, usize); 6] = [
    (LEFT_EYE, 468),
    (RIGHT_EYE, 473),
    (FOREHEAD_TOP, 10),
    (CHIN_BOTTOM, 152),
    (LEFT_TEMPLE, 234),
    (RIGHT_TEMPLE, 454),
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        NormalizedLandmark { x, y, z }
    }
}

/// As per the FaceLandmarker detection result: one landmark list per detected
/// face, coordinates normalised to [0,1] with origin top-left
pub type FaceFrame = Vec<Vec<NormalizedLandmark>>;

/// Maps a semantic role name to a detector-specific landmark index. Stored as
/// an ordered map so the saved config keeps a stable, readable role order.
pub type LandmarkRoleMap = IndexMap<String, usize>;

pub fn default_role_map() -> LandmarkRoleMap {
    DEFAULT_ROLES
        .iter()
        .map(|(role, index)| (String::from(*role), *index))
        .collect()
}

/// Look up a single landmark by role. A role missing from the table, an index
/// beyond the detector output or a NaN coordinate all count as missing input;
/// NaN must never reach the renderer as a position.
pub fn landmark_for_role<'a>(
    face: &'a [NormalizedLandmark],
    roles: &LandmarkRoleMap,
    role: &str,
) -> Result<&'a NormalizedLandmark> {
    let index = *roles.get(role).ok_or_else(|| {
        Error::MissingInput(format!("no detector index configured for role \"{}\"", role))
    })?;
    let landmark = face.get(index).ok_or_else(|| {
        Error::MissingInput(format!(
            "landmark {} (role \"{}\") absent from frame with {} landmarks",
            index,
            role,
            face.len()
        ))
    })?;
    if !landmark.x.is_finite() || !landmark.y.is_finite() {
        return Err(Error::MissingInput(format!(
            "landmark {} (role \"{}\") has non-finite coordinates",
            index, role
        )));
    }
    Ok(landmark)
}
