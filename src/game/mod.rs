//! Game Module
//!
//! Game-level systems built on the engine's physics and surface model:
//! spawn placement, missions, and tile selection with extrusion.

pub mod config;
pub mod geo;
pub mod level;
pub mod mission;
pub mod types;

pub use config::{ConfigError, ExtrudeConfig, GameConfig, LevelConfig};
pub use geo::{
    ExtrudeStyle, GeneratedObject, GeoMaker, GeoState, GeoUpdate, MeshExtruder,
    PlanarTileSelection, PlatformType,
};
pub use level::{
    LevelManager, LevelReport, PrefabKind, SpawnedObject, find_nearest, find_spawn_points,
};
pub use mission::{Mission, MissionEvent, VoiceCue};
pub use types::{MeshData, Transform, Vertex};
