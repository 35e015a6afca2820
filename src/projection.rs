use map_range::MapRange;
use serde::{Deserialize, Serialize};

use crate::avatar::ScenePoint2D;
use crate::error::{Error, Result};
use crate::landmarks::NormalizedLandmark;

/// A perspective camera fixed to look at the z=0 plane from a positive z
/// offset. Only the cross-section of its view frustum is ever used; there is
/// no projection matrix here.
///
/// Invariants (checked by `validate`, enforced at configuration time):
/// - `vertical_fov_degrees` in (0, 180)
/// - `aspect_ratio > 0`
/// - `z_distance > 0`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraFrustum {
    pub vertical_fov_degrees: f32,
    pub aspect_ratio: f32,
    pub z_distance: f32,
}

impl CameraFrustum {
    pub fn new(vertical_fov_degrees: f32, aspect_ratio: f32, z_distance: f32) -> Result<Self> {
        let frustum = CameraFrustum {
            vertical_fov_degrees,
            aspect_ratio,
            z_distance,
        };
        frustum.validate()?;
        Ok(frustum)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.vertical_fov_degrees > 0. && self.vertical_fov_degrees < 180.) {
            return Err(Error::InvalidConfiguration(format!(
                "vertical FOV must be in (0,180) degrees; got {}",
                self.vertical_fov_degrees
            )));
        }
        if !(self.aspect_ratio > 0.) {
            return Err(Error::InvalidConfiguration(format!(
                "aspect ratio must be positive; got {}",
                self.aspect_ratio
            )));
        }
        if !(self.z_distance > 0.) {
            return Err(Error::InvalidConfiguration(format!(
                "camera z distance must be positive; got {}",
                self.z_distance
            )));
        }
        Ok(())
    }

    /// Recompute the aspect ratio from a new viewport size. Called
    /// synchronously on resize notifications, before the next mapping.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<()> {
        if !(width > 0. && height > 0.) {
            return Err(Error::InvalidConfiguration(format!(
                "viewport dimensions must be positive; got {}x{}",
                width, height
            )));
        }
        self.aspect_ratio = width / height;
        Ok(())
    }

    /// World-space height of the view frustum cross-section at the given
    /// depth along the view axis
    pub fn visible_height_at_depth(&self, depth: f32) -> f32 {
        // compensate for the camera not being positioned at z=0
        let effective_depth = if depth < self.z_distance {
            depth - self.z_distance
        } else {
            depth + self.z_distance
        };

        let v_fov = self.vertical_fov_degrees.to_radians();

        // abs() so the result is never negative
        2. * (v_fov / 2.).tan() * effective_depth.abs()
    }

    pub fn visible_width_at_depth(&self, depth: f32) -> f32 {
        self.visible_height_at_depth(depth) * self.aspect_ratio
    }

    /// Map a normalized landmark (origin top-left, [0,1] on both axes) onto
    /// the visible plane at depth 0 (origin centre, y up). Pure: identical
    /// inputs with an unchanged frustum give bit-identical output.
    pub fn map_to_scene(&self, landmark: &NormalizedLandmark) -> Result<ScenePoint2D> {
        if !landmark.x.is_finite() || !landmark.y.is_finite() {
            return Err(Error::MissingInput(format!(
                "cannot map landmark with non-finite coordinates ({}, {})",
                landmark.x, landmark.y
            )));
        }

        let half_width = self.visible_width_at_depth(0.) / 2.;
        let half_height = self.visible_height_at_depth(0.) / 2.;

        // The y axis is flipped: image coordinates grow downwards, scene
        // coordinates grow upwards
        Ok(ScenePoint2D::new(
            landmark.x.map_range(0. ..1., -half_width..half_width),
            -landmark.y.map_range(0. ..1., -half_height..half_height),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> CameraFrustum {
        CameraFrustum::new(45., 1.5, 10.).expect("valid frustum")
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            CameraFrustum::new(0., 1.5, 10.),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CameraFrustum::new(180., 1.5, 10.),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CameraFrustum::new(45., 0., 10.),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CameraFrustum::new(45., 1.5, -1.),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CameraFrustum::new(f32::NAN, 1.5, 10.),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_visible_dimensions() {
        let f = test_frustum();
        let height = f.visible_height_at_depth(0.);
        assert!(height > 0.);
        assert_eq!(f.visible_width_at_depth(0.), height * 1.5);

        // reference: 2 * tan(fov/2) * |0 - z_distance|
        let expected = 2. * (45f32.to_radians() / 2.).tan() * 10.;
        assert_eq!(height, expected);

        // depths on the far side of the camera still give a positive height
        assert!(f.visible_height_at_depth(20.) > 0.);
    }

    #[test]
    fn test_map_centre_and_corners() {
        let f = test_frustum();
        let w = f.visible_width_at_depth(0.);
        let h = f.visible_height_at_depth(0.);

        let centre = f
            .map_to_scene(&NormalizedLandmark::new(0.5, 0.5, 0.))
            .unwrap();
        assert_eq!(centre, ScenePoint2D::new(0., 0.));

        let top_left = f.map_to_scene(&NormalizedLandmark::new(0., 0., 0.)).unwrap();
        assert_eq!(top_left, ScenePoint2D::new(-w / 2., h / 2.));

        let bottom_right = f.map_to_scene(&NormalizedLandmark::new(1., 1., 0.)).unwrap();
        assert_eq!(bottom_right, ScenePoint2D::new(w / 2., -h / 2.));
    }

    #[test]
    fn test_example_scenario() {
        // frustum {45°, 1.5, 10}; landmark (0.75, 0.25) lands a quarter of the
        // visible extent right of and above centre
        let f = test_frustum();
        let p = f
            .map_to_scene(&NormalizedLandmark::new(0.75, 0.25, 0.))
            .unwrap();
        let expected_x = 0.25 * f.visible_width_at_depth(0.);
        let expected_y = 0.25 * f.visible_height_at_depth(0.);
        assert!((p.x - expected_x).abs() < 1e-4);
        assert!((p.y - expected_y).abs() < 1e-4);
    }

    #[test]
    fn test_mapping_is_pure() {
        let f = test_frustum();
        let landmark = NormalizedLandmark::new(0.123, 0.987, 0.);
        let a = f.map_to_scene(&landmark).unwrap();
        let b = f.map_to_scene(&landmark).unwrap();
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut f = test_frustum();
        f.set_viewport(1920., 1080.).unwrap();
        assert_eq!(f.aspect_ratio, 1920. / 1080.);
        assert!(matches!(
            f.set_viewport(0., 1080.),
            Err(Error::InvalidConfiguration(_))
        ));
        // failed resize leaves the previous aspect in place
        assert_eq!(f.aspect_ratio, 1920. / 1080.);
    }

    #[test]
    fn test_nan_landmark_is_missing_input() {
        let f = test_frustum();
        assert!(matches!(
            f.map_to_scene(&NormalizedLandmark::new(f32::NAN, 0.5, 0.)),
            Err(Error::MissingInput(_))
        ));
    }
}
