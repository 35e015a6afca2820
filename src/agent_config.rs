use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tether_agent::{PlugDefinition, TetherAgent};

use crate::error;
use crate::landmarks::{default_role_map, LandmarkRoleMap};
use crate::projection::CameraFrustum;
use crate::systems::mapping::AvatarMapper;

// Scene-camera defaults: a 45° perspective camera at z=10 looking at the
// z=0 plane, and a webcam-sized viewport
const DEFAULT_VERTICAL_FOV_DEGREES: f32 = 45.;
const DEFAULT_CAMERA_Z_DISTANCE: f32 = 10.;
const DEFAULT_VIEWPORT: ViewportSize = ViewportSize {
    width: 640.,
    height: 480.,
};

/// How often (ms) to flush the recorded sample batch
const DEFAULT_RECORDING_INTERVAL: u64 = 5000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Vertical field of view of the scene camera, in degrees
    pub vertical_fov_degrees: f32,

    /// Distance of the scene camera from the z=0 plane it looks at
    pub camera_z_distance: f32,

    /// Viewport used to derive the aspect ratio at startup; runtime resize
    /// notifications override this via the viewportSize input
    pub viewport: ViewportSize,

    /// Semantic landmark role → detector-specific index
    pub landmark_roles: LandmarkRoleMap,

    /// Publish an avatarPose message for every mapped frame
    pub show_avatar: bool,

    /// Buffer timestamped samples for the periodic poseSamples batch
    pub collect_data: bool,

    /// How often (ms) to flush the recorded sample batch
    pub recording_interval: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            vertical_fov_degrees: DEFAULT_VERTICAL_FOV_DEGREES,
            camera_z_distance: DEFAULT_CAMERA_Z_DISTANCE,
            viewport: DEFAULT_VIEWPORT,
            landmark_roles: default_role_map(),
            show_avatar: true,
            collect_data: false,
            recording_interval: DEFAULT_RECORDING_INTERVAL,
        }
    }
}

impl AgentConfig {
    /// Build the (validated) camera frustum described by this config
    pub fn frustum(&self) -> error::Result<CameraFrustum> {
        if !(self.viewport.width > 0. && self.viewport.height > 0.) {
            return Err(error::Error::InvalidConfiguration(format!(
                "viewport dimensions must be positive; got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        CameraFrustum::new(
            self.vertical_fov_degrees,
            self.viewport.width / self.viewport.height,
            self.camera_z_distance,
        )
    }

    /// Invalid parameters are rejected here, at configuration time, not
    /// discovered mid-computation
    pub fn validate(&self) -> error::Result<()> {
        self.frustum().map(|_| ())
    }

    pub fn parse_remote_config(&mut self, payload: &[u8]) -> Result<()> {
        match rmp_serde::from_slice::<AgentConfig>(payload) {
            Ok(config) => {
                config.validate()?;
                *self = config;
                Ok(())
            }
            Err(e) => Err(anyhow!("Failed to parse Config from message: {}", e)),
        }
    }

    pub fn write_config_to_file(&self, config_file_path: &str) -> Result<()> {
        debug!("Current state of config: {:?}", self);
        let text = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, text)?;
        info!("Wrote config to file: {:?}", config_file_path);
        Ok(())
    }

    pub fn handle_save_message(
        &mut self,
        tether_agent: &TetherAgent,
        config_output: &PlugDefinition,
        payload: &[u8],
        mapper: &mut AvatarMapper,
        config_file_path: &str,
    ) -> Result<()> {
        match self.parse_remote_config(payload) {
            Ok(()) => {
                info!("Remote-provided config parsed OK; update the Mapper, save to disk and (re) publish");
                mapper.update_from_config(self)?;
                self.save_and_republish(tether_agent, config_output, config_file_path)
            }
            Err(e) => Err(anyhow!("Handle save-message failure: {e}")),
        }
    }

    pub fn save_and_republish(
        &self,
        tether_agent: &TetherAgent,
        config_output: &PlugDefinition,
        config_file_path: &str,
    ) -> Result<()> {
        info!("Saving config to disk and re-publishing via Tether...");
        self.write_config_to_file(config_file_path)?;

        tether_agent
            .encode_and_publish(config_output, self)
            .expect("failed to publish config");
        Ok(())
    }
}

pub fn load_config_from_file(config_file_path: &str) -> Result<AgentConfig> {
    match std::fs::read_to_string(config_file_path) {
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                warn!(
                    "Avatar config file not found; using defaults, will create one at {}",
                    &config_file_path
                );
                Ok(AgentConfig::default())
            } else {
                Err(anyhow!(
                    "Failed to load avatar config from disk; error: {:?}",
                    e
                ))
            }
        }
        Ok(s) => {
            info!("Loaded avatar config OK from \"{}\"", config_file_path);
            match serde_json::from_str::<AgentConfig>(&s) {
                Ok(loaded_config) => {
                    debug!("Config parsed data from file: {:?}", &loaded_config);
                    loaded_config.validate()?;
                    Ok(loaded_config)
                }
                Err(e) => Err(anyhow!("Failed to parse config data: {}", e)),
            }
        }
    }
}
