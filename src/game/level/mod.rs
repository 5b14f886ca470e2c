//! Level Module
//!
//! Surface-constrained placement of game objects in a scanned room.
//!
//! # Submodules
//!
//! - [`placement`] - Grid search for collision-free spawn points
//! - [`spawner`] - Plane-local point to world transform
//! - [`level_manager`] - Level generation flow and mission hookup

pub mod level_manager;
pub mod placement;
pub mod spawner;

pub use level_manager::{LevelManager, LevelReport, SkipReason};
pub use placement::{
    find_nearest, find_nearest_to_world, find_spawn_points, footprint_box, footprint_half_extents,
    free_footprints,
};
pub use spawner::{PrefabKind, SpawnedObject, spawn, spawn_transform, up_to_forward};
