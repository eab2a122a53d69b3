//! Simulation configuration

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::camera_controller::ChaseCameraParams;
use crate::core::Result;
use crate::particles::EmitterConfig;
use crate::physics::{AirplaneParams, BodyParams};
use crate::terrain::{RunwayParams, TerrainParams};

/// Everything needed to build and run a world. Missing JSON fields take
/// their defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub terrain: TerrainParams,
    /// Flattened strip for take-off; `None` leaves the terrain untouched
    pub runway: Option<RunwayParams>,
    pub airplane: AirplaneParams,
    pub airplane_start: Vec3,
    pub airplane_scale: f32,
    pub airplane_contact_offset: f32,
    pub body: BodyParams,
    pub crate_start: Vec3,
    pub crate_contact_offset: f32,
    /// Upward impulse applied to the crate on a jump
    pub jump_impulse: f32,
    pub chase_camera: ChaseCameraParams,
    /// Engine smoke, stamped into world space behind the airplane
    pub smoke: EmitterConfig,
    /// Wing-tip contrail, following the airplane
    pub contrail: EmitterConfig,
    /// Fixed physics step in seconds
    pub physics_step: f32,
    pub max_steps_per_frame: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainParams::default(),
            runway: Some(RunwayParams::default()),
            airplane: AirplaneParams::default(),
            airplane_start: Vec3::new(52.5, 12.0, 35.5),
            airplane_scale: 0.5,
            airplane_contact_offset: -1.0,
            body: BodyParams::default(),
            crate_start: Vec3::new(40.0, 3.0, 40.0),
            crate_contact_offset: -0.6,
            jump_impulse: 600.0,
            chase_camera: ChaseCameraParams::default(),
            smoke: EmitterConfig {
                capacity: 400,
                particles_per_second: 60.0,
                lifetime: [1.5, 3.0],
                size: [0.6, 1.4],
                direction_min: Vec3::new(-0.3, 0.2, -0.3),
                direction_max: Vec3::new(0.3, 1.0, 0.3),
                speed: 1.5,
                offset: Vec3::new(0.0, 0.0, -4.0),
                follow_parent: false,
                atlas_size: 4,
                seed: 1,
            },
            contrail: EmitterConfig {
                capacity: 200,
                particles_per_second: 40.0,
                lifetime: [0.4, 0.8],
                size: [0.2, 0.4],
                direction_min: Vec3::new(-0.05, -0.05, -1.0),
                direction_max: Vec3::new(0.05, 0.05, -0.8),
                speed: 3.0,
                offset: Vec3::new(4.5, 0.0, -1.0),
                follow_parent: true,
                atlas_size: 1,
                seed: 2,
            },
            physics_step: 1.0 / 60.0,
            max_steps_per_frame: 8,
        }
    }
}

impl SimConfig {
    /// Read a JSON config
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("sim.json");

        let mut config = SimConfig::default();
        config.terrain.seed = 7;
        config.runway = None;
        config.smoke.particles_per_second = 12.5;
        config.save(&path).unwrap();

        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded.terrain.seed, 7);
        assert!(loaded.runway.is_none());
        assert_eq!(loaded.smoke.particles_per_second, 12.5);
        assert_eq!(loaded.airplane_start, config.airplane_start);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "terrain": { "seed": 3, "size_exponent": 4 } }"#).unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.terrain.seed, 3);
        assert_eq!(config.terrain.size(), 17);
        assert_eq!(config.terrain.smoothness, 0.5);
        assert_eq!(config.physics_step, 1.0 / 60.0);
        assert!(config.runway.is_some());
    }

    #[test]
    fn test_partial_chase_camera() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "chase_camera": { "distance": 5.0 } }"#).unwrap();
        let defaults = ChaseCameraParams::default();
        assert_eq!(config.chase_camera.distance, 5.0);
        assert_eq!(config.chase_camera.height, defaults.height);
        assert_eq!(config.chase_camera.stiffness, defaults.stiffness);
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(SimConfig::load(&missing), Err(Error::Io(_))));

        let broken = temp_dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(SimConfig::load(&broken), Err(Error::Config(_))));
    }
}
