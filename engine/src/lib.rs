//! Holoforge Engine Library
//!
//! Procedural geometry and spatial placement for augmented-reality rooms.
//! Given the planes and collision mesh of a live-scanned room, the library
//! finds collision-free spots on detected surfaces to spawn game objects,
//! and lets a player paint a region of a surface with a ray and extrude it
//! into solid geometry through an animated transition.
//!
//! # Modules
//!
//! - [`physics`] - Collision primitives, layers, and the collision world
//! - [`world`] - Surface Model and playspace registry
//! - [`game`] - Placement engine, object spawner, missions, tile
//!   selection, mesh extrusion and the extrusion state machine
//!
//! # Example
//!
//! ```ignore
//! use holoforge_engine::game::level::{find_spawn_points, find_nearest};
//! use holoforge_engine::physics::{CollisionLayers, CollisionWorld};
//! use holoforge_engine::world::{PlaneId, SurfaceKind, SurfacePlane};
//! use glam::{Vec2, Vec3};
//!
//! let world = CollisionWorld::new();
//! let half = Vec2::new(2.0, 3.0);
//! let floor = SurfacePlane::horizontal(PlaneId(0), SurfaceKind::Floor, Vec3::ZERO, half);
//!
//! let candidates = find_spawn_points(
//!     &world,
//!     &floor,
//!     Vec3::ONE,
//!     Vec2::splat(0.5),
//!     0.02,
//!     CollisionLayers::STATIC_SCAN,
//! );
//! if let Some(spot) = find_nearest(&candidates, Vec2::ZERO) {
//!     // spawn at `spot`
//! }
//! ```

pub mod physics;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export commonly used types at crate level for convenience
pub use physics::{CollisionLayers, CollisionQuery, CollisionWorld};
pub use world::{Playspace, SurfaceKind, SurfacePlane, SurfaceSource};
