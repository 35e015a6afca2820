use serde::{Deserialize, Serialize};

use crate::avatar::ScenePoint2D;
use crate::error::{Error, Result};
use crate::geometry_utils::distance_points;

/// Head tilt derived from two vertically-aligned facial reference points
/// (nominally forehead and chin) already mapped into scene space
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrientationSample {
    pub top: ScenePoint2D,
    pub bottom: ScenePoint2D,
    pub tilt_angle_radians: f32,
}

/// Return the rotation about the viewing axis implied by the top→bottom
/// segment deviating horizontally. A third point at `(bottom.x, top.y)` forms
/// a right triangle with the segment as hypotenuse; the tilt is
/// `asin(opposite / hypotenuse)`, positive when the top point leans towards
/// positive x, negated when mirrored.
pub fn compute_tilt_angle(top: ScenePoint2D, bottom: ScenePoint2D) -> Result<OrientationSample> {
    let hypotenuse = distance_points(&(top.x, top.y), &(bottom.x, bottom.y));
    if hypotenuse == 0.0 {
        return Err(Error::DegenerateInput(String::from(
            "coincident reference points; tilt angle undefined",
        )));
    }

    // Same distance formula as the hypotenuse, so the ratio below cannot
    // drift above 1 through rounding
    let corner = ScenePoint2D::new(bottom.x, top.y);
    let opposite = distance_points(&(top.x, top.y), &(corner.x, corner.y));

    let magnitude = (opposite / hypotenuse).asin();
    let tilt_angle_radians = if top.x < bottom.x {
        -magnitude
    } else {
        magnitude
    };

    Ok(OrientationSample {
        top,
        bottom,
        tilt_angle_radians,
    })
}
