//! End-to-end checks of the landmark → scene mapping pipeline, driving the
//! public API the way the backend loop does: frames in, avatar poses out,
//! with a viewport resize in between.

use tether_face_avatar::agent_config::{AgentConfig, ViewportSize};
use tether_face_avatar::landmarks::{self, LandmarkRoleMap, NormalizedLandmark};
use tether_face_avatar::systems::Systems;

fn pipeline_config() -> AgentConfig {
    let mut roles = LandmarkRoleMap::new();
    roles.insert(String::from(landmarks::LEFT_EYE), 0);
    roles.insert(String::from(landmarks::RIGHT_EYE), 1);
    roles.insert(String::from(landmarks::FOREHEAD_TOP), 2);
    roles.insert(String::from(landmarks::CHIN_BOTTOM), 3);

    AgentConfig {
        viewport: ViewportSize {
            width: 1500.,
            height: 1000.,
        },
        landmark_roles: roles,
        collect_data: true,
        ..AgentConfig::default()
    }
}

fn face(
    left_eye: (f32, f32),
    right_eye: (f32, f32),
    forehead: (f32, f32),
    chin: (f32, f32),
) -> Vec<NormalizedLandmark> {
    [left_eye, right_eye, forehead, chin]
        .iter()
        .map(|(x, y)| NormalizedLandmark::new(*x, *y, 0.))
        .collect()
}

#[test]
fn frames_map_to_poses_and_samples() {
    let config = pipeline_config();
    let mut systems = Systems::new(&config).expect("valid config");

    let frames = vec![
        face((0.4, 0.45), (0.6, 0.45), (0.5, 0.3), (0.5, 0.7)),
        face((0.45, 0.4), (0.65, 0.5), (0.6, 0.3), (0.5, 0.7)),
    ];

    for frame in &frames {
        let pose = systems.mapper.map_face(frame).expect("complete face");
        systems.recorder.record(&pose);
    }

    let batch = systems.recorder.drain();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].tilt_angle_radians, Some(0.));
    assert!(batch[1].tilt_angle_radians.unwrap() > 0.);
    assert!(systems.recorder.is_empty());
}

#[test]
fn occluded_frames_are_skipped_without_poisoning_the_pipeline() {
    let config = pipeline_config();
    let mut systems = Systems::new(&config).expect("valid config");

    // A frame with too few landmarks fails, the next complete one succeeds
    let partial = vec![NormalizedLandmark::new(0.4, 0.45, 0.)];
    assert!(systems.mapper.map_face(&partial).is_err());

    let complete = face((0.4, 0.45), (0.6, 0.45), (0.5, 0.3), (0.5, 0.7));
    let pose = systems.mapper.map_face(&complete).expect("complete face");
    assert!(pose.orientation.is_some());
}

#[test]
fn viewport_resize_is_visible_to_the_next_frame() {
    let config = pipeline_config();
    let mut systems = Systems::new(&config).expect("valid config");

    let frame = face((0.4, 0.45), (0.6, 0.45), (0.5, 0.3), (0.5, 0.7));
    let before = systems.mapper.map_face(&frame).expect("complete face");

    // Same pixel aspect, larger viewport: mapping unchanged
    systems.mapper.set_viewport(3000., 2000.).expect("valid size");
    let unchanged = systems.mapper.map_face(&frame).expect("complete face");
    assert_eq!(before.left_eye, unchanged.left_eye);

    // Wider viewport: horizontal spread grows, vertical stays
    systems.mapper.set_viewport(3000., 1000.).expect("valid size");
    let wider = systems.mapper.map_face(&frame).expect("complete face");
    assert!(wider.left_eye.x < before.left_eye.x); // left eye sits at negative x
    assert_eq!(wider.left_eye.y, before.left_eye.y);
}
