pub mod agent_config;
pub mod avatar;
pub mod avatar_system;
pub mod error;
pub mod geometry_utils;
pub mod landmarks;
pub mod orientation;
pub mod projection;
pub mod settings;
pub mod systems;

pub type Point2D = (f32, f32);
