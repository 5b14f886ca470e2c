//! Level Configuration
//!
//! Footprints, grid steps and table offsets used when populating a
//! scanned room with the factory and tanks.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::CollisionLayers;

/// Parameters for
/// [`LevelManager::generate_level`](crate::game::level::LevelManager::generate_level).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Factory size (width, height, depth) in meters, object-local Y up
    pub factory_footprint: Vec3,
    /// Spacing between candidate grid points on the floor
    pub factory_step: Vec2,
    /// Gap kept between the floor and the bottom of the footprint
    pub factory_clearance: f32,
    /// Tank positions on the largest table, plane-local
    pub primary_table_tanks: Vec<Vec2>,
    /// Tank position on every further table, plane-local
    pub extra_table_tank: Vec2,
    /// Layers the footprint must not overlap
    pub placement_mask: CollisionLayers,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            factory_footprint: Vec3::ONE,
            factory_step: Vec2::splat(0.1),
            factory_clearance: 0.02,
            primary_table_tanks: vec![Vec2::new(0.0, 0.2), Vec2::new(-0.25, -0.2)],
            extra_table_tank: Vec2::ZERO,
            placement_mask: CollisionLayers::STATIC_SCAN,
        }
    }
}
