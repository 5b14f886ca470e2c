//! Config Module
//!
//! Centralized configuration for level generation and extrusion, loadable
//! from a JSON file. Every field has a default, so a config file only needs
//! the values it overrides.

pub mod extrude_config;
pub mod level_config;

pub use extrude_config::{ExtrudeConfig, FloatingConfig, UvQuad, UvTables};
pub use level_config::LevelConfig;

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::world::ClassifyParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level game configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub extrude: ExtrudeConfig,
    pub playspace: ClassifyParams,
}

impl GameConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the placement and extrusion code cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = &self.level;
        if !(level.factory_step.x > 0.0 && level.factory_step.y > 0.0) {
            let step = level.factory_step;
            return invalid(format!("factory_step must be positive, got {step}"));
        }
        if !level.factory_footprint.cmpgt(glam::Vec3::ZERO).all() {
            let footprint = level.factory_footprint;
            return invalid(format!("factory_footprint must be positive, got {footprint}"));
        }
        if level.factory_clearance < 0.0 {
            let clearance = level.factory_clearance;
            return invalid(format!("factory_clearance must not be negative, got {clearance}"));
        }

        let extrude = &self.extrude;
        if extrude.tile_resolution == 0 {
            return invalid("tile_resolution must be at least 1".to_string());
        }
        if !(extrude.duration > 0.0) {
            return invalid(format!("duration must be positive, got {}", extrude.duration));
        }
        if !(extrude.ray_length > 0.0) {
            return invalid(format!("ray_length must be positive, got {}", extrude.ray_length));
        }
        if extrude.depth < 0.0 || extrude.crown_height < 0.0 {
            return invalid("depth and crown_height must not be negative".to_string());
        }
        if !(extrude.floating.period > 0.0) {
            let period = extrude.floating.period;
            return invalid(format!("floating.period must be positive, got {period}"));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(message))
}
