//! Physics module
//!
//! Collision queries against the live room scan and generated geometry.
//! Built from scratch without an external physics library: the placement
//! engine only needs synchronous "is this box free?" and ray queries.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, world +Y is up.
//!
//! # Submodules
//!
//! - [`collision`] - Ray, AABB, OBB and triangle intersection primitives
//! - [`layers`] - Collision categories and query masks
//! - [`world`] - Collider storage, box-overlap and ray queries

pub mod collision;
pub mod layers;
pub mod world;

pub use collision::{Aabb, Obb, obb_obb_overlap, obb_triangle_overlap, ray_aabb_intersect};
pub use layers::CollisionLayers;
pub use world::{
    Collider, ColliderHandle, ColliderShape, CollisionQuery, CollisionWorld, RayHit, TriMesh,
};
