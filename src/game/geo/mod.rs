//! Geometry Module
//!
//! Interactive surface selection and extrusion into solid platforms.
//!
//! # Submodules
//!
//! - [`selection`] - Tile selection grown from ray hits on one plane
//! - [`extruder`] - Boundary polygon to closed solid mesh
//! - [`generated`] - Generated object with mesh, collider and renderer
//! - [`geo_maker`] - Idle / Select / AnimatedExtrude state machine

pub mod extruder;
pub mod generated;
pub mod geo_maker;
pub mod selection;

pub use extruder::{ExtrudeStyle, MeshExtruder, mesh_height};
pub use generated::{GeneratedObject, MaterialId, MeshCollider, MeshRenderer, PlatformBehavior};
pub use geo_maker::{FinishCallback, GeoMaker, GeoState, GeoUpdate, PlatformType, Ray};
pub use selection::{PlanarTileSelection, TileCoord, polygon_area, signed_area};
