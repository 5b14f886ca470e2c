//! World Module
//!
//! The Surface Model and the registry of surfaces detected in the
//! scanned room.
//!
//! ## Conventions
//! - 1 unit = 1 meter, world +Y is up
//! - Plane-local X/Y span the surface, local +Z is the plane's forward

pub mod playspace;
pub mod surface;

pub use playspace::{ClassifyParams, Playspace, SurfaceSource, sort_by_area_descending};
pub use surface::{PlaneBounds, PlaneHit, PlaneId, SurfaceKind, SurfacePlane};
